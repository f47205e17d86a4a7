use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{GridError, ParseMoveError};

/// Largest tile a `u64` can hold. Two of these never merge.
pub const MAX_TILE: u64 = 1 << 63;

#[inline]
fn mergeable(a: u64, b: u64) -> bool {
    a != 0 && a == b && a < MAX_TILE
}

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All directions in the order hints and terminal checks visit them.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Unit step for this direction as `(row, col)` deltas.
    #[inline]
    pub fn vector(self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::Up => "UP",
            Move::Down => "DOWN",
            Move::Left => "LEFT",
            Move::Right => "RIGHT",
        };
        f.write_str(s)
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Move::Up),
            "down" => Ok(Move::Down),
            "left" => Ok(Move::Left),
            "right" => Ok(Move::Right),
            _ => Err(ParseMoveError(s.to_string())),
        }
    }
}

/// Grid coordinates as `(row, col)`.
pub type Pos = (usize, usize);

/// Per-move annotation on a tile. Reset to `Settled` at the start of every move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileMark {
    #[default]
    Settled,
    /// Spawned by the move that just executed.
    Spawned,
    /// Produced by a merge in the move that just executed. `from` holds the
    /// cells of the moving tile (before the move) and of the tile it merged into.
    Merged { from: [Pos; 2] },
}

/// One cell occupant. `value == 0` is an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub value: u64,
    pub row: usize,
    pub col: usize,
    pub mark: TileMark,
}

impl Tile {
    #[inline]
    pub const fn empty(row: usize, col: usize) -> Self {
        Tile { value: 0, row, col, mark: TileMark::Settled }
    }

    #[inline]
    pub fn is_empty(&self) -> bool { self.value == 0 }

    #[inline]
    pub fn is_new(&self) -> bool { matches!(self.mark, TileMark::Spawned) }

    /// Source cells when this tile was created by a merge this move.
    #[inline]
    pub fn merged_from(&self) -> Option<[Pos; 2]> {
        match self.mark {
            TileMark::Merged { from } => Some(from),
            _ => None,
        }
    }
}

/// Result of sliding a grid in one direction (no random insert).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Grid after the slide, with merge marks set.
    pub grid: Grid,
    /// True if any tile moved or merged.
    pub changed: bool,
    /// Sum of the values produced by merges.
    pub score_delta: u64,
    pub merges: u32,
    /// Largest value produced by a merge (0 if none).
    pub max_merged: u64,
}

/// Square grid of tiles, stored row-major, one tile per cell.
///
/// Serializes as plain rows of values; marks are per-move state and are not persisted.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u64>>", into = "Vec<Vec<u64>>")]
pub struct Grid {
    size: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// An all-empty grid of side `size`.
    pub fn new(size: usize) -> Self {
        debug_assert!(size >= 2, "grid size must be at least 2");
        let cells = (0..size * size).map(|idx| Tile::empty(idx / size, idx % size)).collect();
        Grid { size, cells }
    }

    /// Build a grid from rows of tile values, validating shape and values.
    ///
    /// ```
    /// use puzzle_2048::engine::Grid;
    /// let g = Grid::from_values(&[[2u64, 0], [0, 4]]).unwrap();
    /// assert_eq!(g.value(1, 1), 4);
    /// assert!(Grid::from_values(&[[3u64, 0], [0, 0]]).is_err());
    /// ```
    pub fn from_values<V: AsRef<[u64]>>(rows: &[V]) -> Result<Self, GridError> {
        let size = rows.len();
        if size < 2 {
            return Err(GridError::TooSmall(size));
        }
        let mut grid = Grid::new(size);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != size {
                return Err(GridError::NotSquare { row, expected: size, found: values.len() });
            }
            for (col, &value) in values.iter().enumerate() {
                if value != 0 && (value < 2 || !value.is_power_of_two()) {
                    return Err(GridError::InvalidTile { row, col, value });
                }
                grid.set(Tile { value, row, col, mark: TileMark::Settled });
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn size(&self) -> usize { self.size }

    /// Tile at `(row, col)`. Panics when out of bounds.
    #[inline]
    pub fn tile(&self, row: usize, col: usize) -> &Tile { &self.cells[self.idx(row, col)] }

    #[inline]
    pub fn value(&self, row: usize, col: usize) -> u64 { self.tile(row, col).value }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ { self.cells.iter() }

    /// Tile values as rows.
    pub fn to_values(&self) -> Vec<Vec<u64>> {
        self.cells.chunks(self.size).map(|row| row.iter().map(|t| t.value).collect()).collect()
    }

    /// Coordinates of all empty cells, row-major.
    pub fn empty_cells(&self) -> Vec<Pos> {
        self.cells.iter().filter(|t| t.is_empty()).map(|t| (t.row, t.col)).collect()
    }

    pub fn count_empty(&self) -> usize { self.cells.iter().filter(|t| t.is_empty()).count() }

    pub fn count_non_empty(&self) -> usize { self.cells.len() - self.count_empty() }

    /// Highest tile value on the grid (0 when empty).
    pub fn highest_tile(&self) -> u64 { self.cells.iter().map(|t| t.value).max().unwrap_or(0) }

    /// True if an empty cell exists or two orthogonal neighbours share a value.
    pub fn moves_available(&self) -> bool {
        if self.cells.iter().any(Tile::is_empty) {
            return true;
        }
        for row in 0..self.size {
            for col in 0..self.size {
                let value = self.value(row, col);
                if col + 1 < self.size && mergeable(self.value(row, col + 1), value) {
                    return true;
                }
                if row + 1 < self.size && mergeable(self.value(row + 1, col), value) {
                    return true;
                }
            }
        }
        false
    }

    /// Slide/merge tiles in `dir`. Pure: `self` is untouched and no tile is spawned.
    ///
    /// Tiles nearest the target edge are processed first, and a tile produced by a
    /// merge cannot merge again in the same move.
    ///
    /// ```
    /// use puzzle_2048::engine::{Grid, Move};
    /// let g = Grid::from_values(&[[2u64, 2, 4, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// let slide = g.shift(Move::Left);
    /// assert_eq!(slide.grid.to_values()[0], vec![4, 4, 0, 0]);
    /// assert_eq!(slide.score_delta, 4);
    /// ```
    pub fn shift(&self, dir: Move) -> Slide {
        let mut grid = self.clone();
        grid.clear_marks();
        let vector = dir.vector();
        let (rows, cols) = traversals(self.size, dir);

        let mut changed = false;
        let mut score_delta: u64 = 0;
        let mut merges = 0;
        let mut max_merged = 0;
        for &row in &rows {
            for &col in &cols {
                let tile = *grid.tile(row, col);
                if tile.is_empty() {
                    continue;
                }
                let (farthest, next) = grid.farthest_position((row, col), vector);
                if let Some(next) = next {
                    let target = grid.tile(next.0, next.1);
                    if mergeable(target.value, tile.value) && target.merged_from().is_none() {
                        let value = tile.value * 2;
                        grid.set(Tile {
                            value,
                            row: next.0,
                            col: next.1,
                            mark: TileMark::Merged { from: [(row, col), next] },
                        });
                        grid.set(Tile::empty(row, col));
                        score_delta = score_delta.saturating_add(value);
                        merges += 1;
                        max_merged = max_merged.max(value);
                        changed = true;
                        continue;
                    }
                }
                if farthest != (row, col) {
                    grid.set(Tile::empty(row, col));
                    grid.set(Tile { row: farthest.0, col: farthest.1, ..tile });
                    changed = true;
                }
            }
        }
        Slide { grid, changed, score_delta, merges, max_merged }
    }

    /// Insert a 2 (or a 4 with probability `four_probability`) into a uniformly
    /// chosen empty cell, using the provided RNG. Returns the cell, or `None` on a full grid.
    ///
    /// ```
    /// use puzzle_2048::engine::Grid;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let mut g = Grid::new(4);
    /// g.insert_random_tile(&mut rng, 0.1);
    /// g.insert_random_tile(&mut rng, 0.1);
    /// assert_eq!(g.count_empty(), 14);
    /// ```
    pub fn insert_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R, four_probability: f64) -> Option<Pos> {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let (row, col) = empty[rng.gen_range(0..empty.len())];
        let value = if rng.gen::<f64>() < four_probability { 4 } else { 2 };
        self.set(Tile { value, row, col, mark: TileMark::Spawned });
        Some((row, col))
    }

    pub(crate) fn clear_marks(&mut self) {
        for tile in &mut self.cells {
            tile.mark = TileMark::Settled;
        }
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.size && col < self.size);
        row * self.size + col
    }

    #[inline]
    fn within_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.size && (col as usize) < self.size
    }

    /// Place `tile` at its own coordinates.
    #[inline]
    fn set(&mut self, tile: Tile) {
        let idx = self.idx(tile.row, tile.col);
        self.cells[idx] = tile;
    }

    /// Farthest empty cell reachable from `from` along `vector`, and the first
    /// occupied cell beyond it (`None` when the walk leaves the grid).
    fn farthest_position(&self, from: Pos, (dr, dc): (isize, isize)) -> (Pos, Option<Pos>) {
        let mut previous = from;
        loop {
            let row = previous.0 as isize + dr;
            let col = previous.1 as isize + dc;
            if !self.within_bounds(row, col) {
                return (previous, None);
            }
            let current = (row as usize, col as usize);
            if !self.tile(current.0, current.1).is_empty() {
                return (previous, Some(current));
            }
            previous = current;
        }
    }
}

/// Row and column visiting order for `dir`: cells nearest the target edge come first.
fn traversals(size: usize, dir: Move) -> (Vec<usize>, Vec<usize>) {
    let mut rows: Vec<usize> = (0..size).collect();
    let mut cols: Vec<usize> = (0..size).collect();
    if dir == Move::Down {
        rows.reverse();
    }
    if dir == Move::Right {
        cols.reverse();
    }
    (rows, cols)
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid").field("size", &self.size).field("values", &self.to_values()).finish()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "-".repeat(self.size * 8);
        writeln!(f)?;
        for (idx, row) in self.cells.chunks(self.size).enumerate() {
            if idx > 0 {
                writeln!(f, "{separator}")?;
            }
            let cells: Vec<String> = row.iter().map(|t| format_val(t.value)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<u64>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<u64>>) -> Result<Self, Self::Error> { Grid::from_values(&rows) }
}

impl From<Grid> for Vec<Vec<u64>> {
    fn from(grid: Grid) -> Self { grid.to_values() }
}

fn format_val(val: u64) -> String {
    match val {
        0 => String::from("       "),
        x => format!("{:^7}", x),
    }
}
