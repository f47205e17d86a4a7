//! One-ply move hints.
//!
//! Each direction is slid on a copy of the grid with [`Grid::shift`]; effective
//! moves are ranked by [`evaluate`] on the post-slide board (no random tile),
//! so hints are deterministic and never touch live game state.
//!
//! ```
//! use puzzle_2048::engine::{Grid, Move};
//! use puzzle_2048::hint;
//!
//! let g = Grid::from_values(&[[2u64, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
//! assert_eq!(hint::best_move(&g), Some(Move::Left));
//!
//! let stuck = Grid::from_values(&[[2u64, 4], [4, 2]]).unwrap();
//! assert_eq!(hint::best_move(&stuck), None);
//! ```

use crate::engine::{Grid, Move};

mod heuristic;

pub use heuristic::evaluate;

/// Per-direction evaluation at the root.
///
/// `legal` is false when the move is a no-op for the current grid; `score` is
/// then 0 and meaningless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchEval {
    pub dir: Move,
    pub score: i64,
    pub legal: bool,
}

/// Evaluate every direction, in `[Up, Down, Left, Right]` order.
pub fn branch_evals(grid: &Grid) -> [BranchEval; 4] {
    Move::ALL.map(|dir| {
        let slide = grid.shift(dir);
        if slide.changed {
            BranchEval { dir, score: evaluate(&slide.grid), legal: true }
        } else {
            BranchEval { dir, score: 0, legal: false }
        }
    })
}

/// Best-scoring effective direction, or `None` when no move changes the grid.
///
/// Ties go to the earlier direction in `[Up, Down, Left, Right]`.
pub fn best_move(grid: &Grid) -> Option<Move> {
    let mut best: Option<BranchEval> = None;
    for eval in branch_evals(grid) {
        if !eval.legal {
            continue;
        }
        if best.map_or(true, |b| eval.score > b.score) {
            best = Some(eval);
        }
    }
    best.map(|b| b.dir)
}
