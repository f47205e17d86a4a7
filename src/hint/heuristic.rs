use crate::engine::Grid;

const EMPTY_WEIGHT: i64 = 100;
const CORNER_BONUS: i64 = 1000;

/// Board quality used to rank hint candidates. Higher is better.
///
/// Rewards empty cells, penalizes value gaps between orthogonal neighbours and
/// adds a flat bonus when the highest tile sits in a corner.
#[inline]
pub fn evaluate(grid: &Grid) -> i64 {
    calc_empty(grid).saturating_sub(calc_roughness(grid)).saturating_add(calc_corner(grid))
}

fn calc_empty(grid: &Grid) -> i64 {
    grid.count_empty() as i64 * EMPTY_WEIGHT
}

/// Sum of |a - b| over horizontally and vertically adjacent non-empty pairs.
fn calc_roughness(grid: &Grid) -> i64 {
    let n = grid.size();
    let mut penalty = 0i64;
    for i in 0..n {
        for j in 0..n - 1 {
            penalty = penalty
                .saturating_add(pair_gap(grid.value(i, j), grid.value(i, j + 1)))
                .saturating_add(pair_gap(grid.value(j, i), grid.value(j + 1, i)));
        }
    }
    penalty
}

#[inline]
fn pair_gap(a: u64, b: u64) -> i64 {
    if a == 0 || b == 0 { 0 } else { i64::try_from(a.abs_diff(b)).unwrap_or(i64::MAX) }
}

fn calc_corner(grid: &Grid) -> i64 {
    let last = grid.size() - 1;
    let max = grid.highest_tile();
    let corners = [(0, 0), (0, last), (last, 0), (last, last)];
    if corners.iter().any(|&(row, col)| grid.value(row, col) == max) { CORNER_BONUS } else { 0 }
}
