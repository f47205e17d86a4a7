//! Stateful game: score, undo history, win/loss flags and the random source.

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::engine::{Grid, Move};
use crate::error::{ConfigError, Error, GridError};
use crate::hint;
use crate::history::History;

/// Immutable snapshot of a game handed to callers (deep copy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub grid: Grid,
    pub score: u64,
    pub best_score: u64,
    pub move_count: u64,
    pub is_game_over: bool,
    pub is_won: bool,
}

#[derive(Debug, Clone)]
struct Snapshot {
    grid: Grid,
    score: u64,
    move_count: u64,
}

/// 2048 game engine.
///
/// Owns the grid, score, best score, move counter, win/loss flags and a bounded
/// undo history. All operations are synchronous and total; no-ops are reported
/// through `bool`/`Option` results. Randomness comes from `R`, so a seeded RNG
/// makes a whole game reproducible.
///
/// ```
/// use puzzle_2048::{GameEngine, Move};
///
/// let mut game = GameEngine::with_seed(7);
/// assert_eq!(game.grid().count_non_empty(), 2);
/// if let Some(dir) = game.hint() {
///     assert!(game.make_move(dir));
///     assert!(game.can_undo());
///     assert!(game.undo());
/// }
/// assert_eq!(game.move_count(), 0);
/// let _ = game.make_move(Move::Left);
/// ```
#[derive(Debug, Clone)]
pub struct GameEngine<R = StdRng> {
    cfg: EngineConfig,
    grid: Grid,
    score: u64,
    best_score: u64,
    move_count: u64,
    is_game_over: bool,
    is_won: bool,
    has_won_before: bool,
    history: History<Snapshot>,
    rng: R,
}

impl GameEngine<StdRng> {
    /// Classic 4x4 game with an entropy-seeded RNG.
    pub fn new() -> Self { Self::build(EngineConfig::default(), StdRng::from_entropy()) }

    /// Classic 4x4 game with a deterministic RNG.
    pub fn with_seed(seed: u64) -> Self { Self::build(EngineConfig::default(), StdRng::seed_from_u64(seed)) }

    /// Custom configuration; `seed = None` seeds from entropy.
    pub fn with_config(cfg: EngineConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(cfg, rng)
    }
}

impl Default for GameEngine<StdRng> {
    fn default() -> Self { Self::new() }
}

impl<R: Rng> GameEngine<R> {
    /// Custom configuration and random source. Starts a fresh game.
    pub fn with_rng(cfg: EngineConfig, rng: R) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self::build(cfg, rng))
    }

    /// Engine positioned on an existing grid with zero score and empty history.
    ///
    /// Game over is evaluated immediately, so a stuck grid reports
    /// `is_game_over()` without any move being attempted.
    pub fn from_grid(cfg: EngineConfig, grid: Grid, rng: R) -> Result<Self, Error> {
        cfg.validate()?;
        if grid.size() != cfg.size {
            return Err(GridError::SizeMismatch { expected: cfg.size, found: grid.size() }.into());
        }
        let history = History::with_capacity(cfg.history_capacity);
        let mut engine = GameEngine {
            grid: Grid::new(cfg.size),
            score: 0,
            best_score: 0,
            move_count: 0,
            is_game_over: false,
            is_won: false,
            has_won_before: false,
            history,
            rng,
            cfg,
        };
        engine.adopt_grid(grid);
        Ok(engine)
    }

    fn build(cfg: EngineConfig, rng: R) -> Self {
        let mut engine = GameEngine {
            grid: Grid::new(cfg.size),
            score: 0,
            best_score: 0,
            move_count: 0,
            is_game_over: false,
            is_won: false,
            has_won_before: false,
            history: History::with_capacity(cfg.history_capacity),
            rng,
            cfg,
        };
        engine.init_game();
        engine
    }

    /// Start a new game: empty grid, zero score and moves, no history, two random tiles.
    ///
    /// The best score is kept. The has-won latch is cleared only when
    /// `EngineConfig::reset_win_on_restart` is set.
    pub fn init_game(&mut self) {
        self.grid = Grid::new(self.cfg.size);
        self.score = 0;
        self.move_count = 0;
        self.is_game_over = false;
        self.is_won = false;
        if self.cfg.reset_win_on_restart {
            self.has_won_before = false;
        }
        self.history.clear();
        self.spawn();
        self.spawn();
        debug!("new {}x{} game, best score {}", self.cfg.size, self.cfg.size, self.best_score);
    }

    #[inline]
    pub fn restart(&mut self) { self.init_game(); }

    /// Slide/merge in `dir`, then spawn one tile if anything changed.
    ///
    /// Returns false, leaving score, moves and history untouched, when the game is
    /// over or the move changes nothing. Tile marks are cleared either way.
    pub fn make_move(&mut self, dir: Move) -> bool {
        if self.is_game_over {
            return false;
        }
        let slide = self.grid.shift(dir);
        if !slide.changed {
            self.grid.clear_marks();
            trace!("move {dir} is a no-op");
            return false;
        }

        let snapshot = self.snapshot();
        self.history.push(snapshot);
        self.grid = slide.grid;
        self.score = self.score.saturating_add(slide.score_delta);
        if slide.max_merged >= self.cfg.win_value && !self.has_won_before {
            self.is_won = true;
            self.has_won_before = true;
            debug!("reached {} after {} moves", slide.max_merged, self.move_count + 1);
        }
        self.spawn();
        self.move_count += 1;
        if !self.grid.moves_available() {
            self.is_game_over = true;
            debug!("game over: score {} in {} moves", self.score, self.move_count);
        }
        if self.score > self.best_score {
            self.best_score = self.score;
        }
        debug!(
            "move {dir}: {} merges, +{} (score {}, moves {})",
            slide.merges, slide.score_delta, self.score, self.move_count
        );
        true
    }

    /// Restore the state before the last effective move. False when history is empty.
    ///
    /// Always leaves the game playable; best score and the has-won latch are kept.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop() else {
            return false;
        };
        self.grid = snapshot.grid;
        self.score = snapshot.score;
        self.move_count = snapshot.move_count;
        self.is_game_over = false;
        debug!("undo to move {} (score {})", self.move_count, self.score);
        true
    }

    /// Suggested direction for the current grid, or `None` if no move changes it.
    pub fn hint(&self) -> Option<Move> { hint::best_move(&self.grid) }

    /// Dismiss the win state and continue; the win does not trigger again this game.
    pub fn keep_playing(&mut self) { self.is_won = false; }

    #[inline]
    pub fn can_undo(&self) -> bool { !self.history.is_empty() }

    #[inline]
    pub fn history_len(&self) -> usize { self.history.len() }

    pub fn game_state(&self) -> GameState {
        GameState {
            grid: self.grid.clone(),
            score: self.score,
            best_score: self.best_score,
            move_count: self.move_count,
            is_game_over: self.is_game_over,
            is_won: self.is_won,
        }
    }

    /// Feed in a persisted best score. Never lowers the current best.
    pub fn set_best_score(&mut self, score: u64) { self.best_score = self.best_score.max(score); }

    /// Resume a persisted game. History is cleared and game over recomputed from the grid.
    pub fn restore(&mut self, state: GameState) -> Result<(), GridError> {
        if state.grid.size() != self.cfg.size {
            return Err(GridError::SizeMismatch { expected: self.cfg.size, found: state.grid.size() });
        }
        self.history.clear();
        self.score = state.score;
        self.move_count = state.move_count;
        self.best_score = self.best_score.max(state.best_score).max(state.score);
        self.adopt_grid(state.grid);
        self.is_won = state.is_won;
        self.has_won_before |= state.is_won;
        debug!("restored game at move {} (score {})", self.move_count, self.score);
        Ok(())
    }

    #[inline]
    pub fn grid(&self) -> &Grid { &self.grid }
    #[inline]
    pub fn grid_size(&self) -> usize { self.cfg.size }
    #[inline]
    pub fn score(&self) -> u64 { self.score }
    #[inline]
    pub fn best_score(&self) -> u64 { self.best_score }
    #[inline]
    pub fn move_count(&self) -> u64 { self.move_count }
    #[inline]
    pub fn is_game_over(&self) -> bool { self.is_game_over }
    #[inline]
    pub fn is_won(&self) -> bool { self.is_won }
    #[inline]
    pub fn has_won_before(&self) -> bool { self.has_won_before }
    #[inline]
    pub fn config(&self) -> &EngineConfig { &self.cfg }

    fn snapshot(&self) -> Snapshot {
        Snapshot { grid: self.grid.clone(), score: self.score, move_count: self.move_count }
    }

    /// Install `grid` and derive the flags that depend only on its contents.
    fn adopt_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.grid.clear_marks();
        self.is_game_over = !self.grid.moves_available();
        if self.grid.highest_tile() >= self.cfg.win_value {
            self.has_won_before = true;
        }
    }

    fn spawn(&mut self) {
        if let Some((row, col)) = self.grid.insert_random_tile(&mut self.rng, self.cfg.four_probability) {
            trace!("spawned {} at ({row}, {col})", self.grid.value(row, col));
        }
    }
}
