//! puzzle-2048: the 2048 tile-merging game as a deterministic state machine
//!
//! This crate provides:
//! - A square `Grid` of tiles with a pure `shift` (slide/merge, no spawn)
//! - A stateful `GameEngine` with score, best score, win/loss flags and bounded undo
//! - One-ply move hints (`hint` module) built on the same pure shift
//! - `EngineConfig` for grid size, history depth, win value and spawn odds
//!
//! The engine performs no I/O. Rendering, input and persistence belong to the caller,
//! which reads `GameState` snapshots and feeds a persisted best score back through
//! `GameEngine::set_best_score`.
//!
//! Quick start:
//! ```
//! use puzzle_2048::engine::{Grid, Move};
//!
//! // Pure slide on a hand-built grid
//! let g = Grid::from_values(&[[2u64, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
//! let slide = g.shift(Move::Left);
//! assert_eq!(slide.grid.value(0, 0), 4);
//! assert_eq!(slide.score_delta, 4);
//! ```
//!
//! Full loop (simplest possible)
//! ```
//! use puzzle_2048::GameEngine;
//!
//! // 1) Seeded engine: two random tiles already placed
//! let mut game = GameEngine::with_seed(123);
//! let mut moves = 0u32;
//!
//! // 2) Follow hints for a few moves (keep doctests fast)
//! while !game.is_game_over() && moves < 4 {
//!     match game.hint() {
//!         Some(dir) => {
//!             game.make_move(dir);
//!             moves += 1;
//!         }
//!         None => break,
//!     }
//! }
//!
//! // 3) Inspect the snapshot, then step back
//! let state = game.game_state();
//! assert_eq!(state.move_count, moves as u64);
//! assert!(game.undo());
//! ```
//!
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod hint;
mod history;

pub use config::EngineConfig;
pub use engine::{Grid, Move, Slide, Tile, TileMark};
pub use error::{ConfigError, Error, GridError, ParseMoveError};
pub use game::{GameEngine, GameState};
