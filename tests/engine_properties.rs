//! Property tests for the game engine over generated seeds and move sequences.
//!
//! Invariants covered:
//! - Score, best score and the highest tile never decrease on a move.
//! - An effective move changes the tile count by exactly `1 - merges`.
//! - A no-op move leaves values, score, moves, flags and history unchanged.
//! - Undo walks back through at most `history_capacity` snapshots verbatim,
//!   then reports false without touching state.
//! - Hints are effective moves and never mutate the engine.
use proptest::prelude::*;
use puzzle_2048::engine::Grid;
use puzzle_2048::{EngineConfig, GameEngine, GameState, Move};
use rand::{rngs::StdRng, SeedableRng};

fn dir_strategy() -> impl Strategy<Value = Move> {
    prop_oneof![Just(Move::Up), Just(Move::Down), Just(Move::Left), Just(Move::Right)]
}

fn same_values(a: &GameState, b: &GameState) -> bool {
    a.grid.to_values() == b.grid.to_values()
        && a.score == b.score
        && a.move_count == b.move_count
        && a.is_game_over == b.is_game_over
}

proptest! {
    #[test]
    fn moves_respect_monotonic_counters(
        seed in any::<u64>(),
        dirs in prop::collection::vec(dir_strategy(), 1..120),
    ) {
        let mut game = GameEngine::with_seed(seed);
        for dir in dirs {
            let before = game.game_state();
            let slide = game.grid().shift(dir);
            let moved = game.make_move(dir);
            let after = game.game_state();

            prop_assert!(after.score >= before.score);
            prop_assert!(after.best_score >= before.best_score);
            prop_assert!(after.best_score >= after.score);
            prop_assert!(after.grid.highest_tile() >= before.grid.highest_tile());

            if before.is_game_over {
                prop_assert!(!moved);
            } else {
                prop_assert_eq!(moved, slide.changed);
            }

            if moved {
                let expected = before.grid.count_non_empty() + 1 - slide.merges as usize;
                prop_assert_eq!(after.grid.count_non_empty(), expected);
                prop_assert_eq!(after.score, before.score + slide.score_delta);
                prop_assert_eq!(after.move_count, before.move_count + 1);
                prop_assert_eq!(after.grid.tiles().filter(|t| t.is_new()).count(), 1);
                prop_assert_eq!(after.is_game_over, !after.grid.moves_available());
            } else {
                prop_assert!(same_values(&before, &after));
            }
        }
    }

    #[test]
    fn noop_moves_leave_no_history(
        seed in any::<u64>(),
        dirs in prop::collection::vec(dir_strategy(), 1..60),
    ) {
        let mut game = GameEngine::with_seed(seed);
        for dir in dirs {
            let history = game.history_len();
            let before = game.game_state();
            if !game.make_move(dir) {
                prop_assert_eq!(game.history_len(), history);
                prop_assert!(same_values(&before, &game.game_state()));
            } else {
                prop_assert_eq!(game.history_len(), (history + 1).min(5));
            }
        }
    }

    #[test]
    fn undo_restores_exact_prior_states(
        seed in any::<u64>(),
        dirs in prop::collection::vec(dir_strategy(), 1..40),
    ) {
        let mut game = GameEngine::with_seed(seed);
        let mut states = vec![game.game_state()];
        for dir in dirs {
            if game.make_move(dir) {
                states.push(game.game_state());
            }
        }
        let available = (states.len() - 1).min(5);
        prop_assert_eq!(game.history_len(), available);

        states.pop();
        for _ in 0..available {
            prop_assert!(game.undo());
            let expected = states.pop().unwrap();
            let now = game.game_state();
            prop_assert_eq!(now.grid.to_values(), expected.grid.to_values());
            prop_assert_eq!(now.score, expected.score);
            prop_assert_eq!(now.move_count, expected.move_count);
            prop_assert!(!now.is_game_over);
        }

        let before = game.game_state();
        prop_assert!(!game.undo());
        prop_assert_eq!(game.game_state(), before);
    }

    #[test]
    fn hints_are_effective_and_pure(seed in any::<u64>(), steps in 1usize..80) {
        let mut game = GameEngine::with_seed(seed);
        for _ in 0..steps {
            let before = game.game_state();
            let history = game.history_len();
            let hint = game.hint();
            prop_assert_eq!(game.game_state(), before);
            prop_assert_eq!(game.history_len(), history);
            match hint {
                Some(dir) => {
                    prop_assert!(game.grid().shift(dir).changed);
                    prop_assert!(game.make_move(dir));
                }
                None => {
                    prop_assert!(Move::ALL.iter().all(|&d| !game.grid().shift(d).changed));
                    break;
                }
            }
        }
    }

    #[test]
    fn custom_history_capacity_is_honoured(seed in any::<u64>(), capacity in 0usize..8) {
        let cfg = EngineConfig { history_capacity: capacity, ..Default::default() };
        let mut game = GameEngine::with_config(cfg, Some(seed)).unwrap();
        let mut effective = 0usize;
        for i in 0..12 {
            if game.make_move(Move::ALL[i % 4]) {
                effective += 1;
            }
        }
        prop_assert_eq!(game.history_len(), effective.min(capacity));
        prop_assert_eq!(game.can_undo(), effective.min(capacity) > 0);
    }
}

#[test]
fn two_twos_merge_left() {
    let grid = Grid::from_values(&[[2u64, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    let mut game = GameEngine::from_grid(EngineConfig::default(), grid, StdRng::seed_from_u64(1)).unwrap();
    assert!(game.make_move(Move::Left));
    let state = game.game_state();
    assert_eq!(state.grid.value(0, 0), 4);
    assert_eq!(state.score, 4);
    assert!(!state.is_won);
    let row0: Vec<u64> = state.grid.to_values()[0].clone();
    assert!(row0[1..].iter().all(|&v| v == 0 || v == 2 || v == 4));
    assert_eq!(state.grid.count_non_empty(), 2);
}

#[test]
fn checkerboard_is_terminal() {
    let grid = Grid::from_values(&[[2u64, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]).unwrap();
    let mut game = GameEngine::from_grid(EngineConfig::default(), grid, StdRng::seed_from_u64(1)).unwrap();
    for dir in Move::ALL {
        assert!(!game.make_move(dir));
    }
    assert!(game.game_state().is_game_over);
    assert_eq!(game.hint(), None);
    assert!(!game.can_undo());
}

#[test]
fn merge_products_do_not_cascade() {
    let grid = Grid::from_values(&[[512u64, 512, 1024, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    let mut game = GameEngine::from_grid(EngineConfig::default(), grid, StdRng::seed_from_u64(1)).unwrap();
    assert!(game.make_move(Move::Left));
    let row0 = &game.grid().to_values()[0];
    assert_eq!(&row0[..2], &[1024, 1024]);
    assert_eq!(game.score(), 1024);
    assert!(!game.is_won());
}

#[test]
fn game_state_serializes_as_plain_rows() {
    let game = GameEngine::with_seed(10);
    let state = game.game_state();
    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["grid"].as_array().unwrap().len(), 4);
    let back: GameState = serde_json::from_value(json).unwrap();
    assert_eq!(back.grid.to_values(), state.grid.to_values());

    let bad = serde_json::json!({
        "grid": [[3, 0], [0, 0]],
        "score": 0, "best_score": 0, "move_count": 0,
        "is_game_over": false, "is_won": false
    });
    assert!(serde_json::from_value::<GameState>(bad).is_err());
}
