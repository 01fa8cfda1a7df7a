//! Offset hex coordinates (odd-q, flat-top)
//!
//! Cells are addressed by (col, row). Odd columns sit half a hex lower than
//! even ones. Distance and neighbour math go through cube coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hex::layout::GridConfig;

/// Grid cell address
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub col: i32,
    pub row: i32,
}

impl Position {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Convert to cube coordinates (q, r, s) with q + r + s == 0
    pub fn to_cube(&self) -> (i32, i32, i32) {
        let q = self.col;
        let r = self.row - (self.col - (self.col & 1)) / 2;
        (q, r, -q - r)
    }

    /// Convert axial (q, r) back to an offset position
    pub fn from_axial(q: i32, r: i32) -> Self {
        Self::new(q, r + (q - (q & 1)) / 2)
    }

    /// Distance in hex steps
    pub fn distance(&self, other: &Self) -> u32 {
        let (q1, r1, s1) = self.to_cube();
        let (q2, r2, s2) = other.to_cube();
        (((q1 - q2).abs() + (r1 - r2).abs() + (s1 - s2).abs()) / 2) as u32
    }

    /// Get all 6 neighboring cells (may lie outside the grid)
    pub fn neighbors(&self) -> [Position; 6] {
        let (q, r, _) = self.to_cube();
        [
            Position::from_axial(q + 1, r - 1),
            Position::from_axial(q + 1, r),
            Position::from_axial(q, r + 1),
            Position::from_axial(q - 1, r + 1),
            Position::from_axial(q - 1, r),
            Position::from_axial(q, r - 1),
        ]
    }

    pub fn is_adjacent(&self, other: &Self) -> bool {
        self.distance(other) == 1
    }

    pub fn is_within(&self, grid: &GridConfig) -> bool {
        self.col >= 0 && self.col < grid.grid_width && self.row >= 0 && self.row < grid.grid_height
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// A reachable cell and the budget left after moving there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachableCell {
    pub position: Position,
    pub remaining_budget: u32,
}

/// Integer hex-grid distance between two cells
pub fn hex_distance(a: Position, b: Position) -> u32 {
    a.distance(&b)
}

/// All in-bounds cells within `radius` steps of `pos`, excluding `pos` itself.
///
/// Ordered by distance, then by (col, row).
pub fn adjacent_cells(pos: Position, radius: u32, grid: &GridConfig) -> Vec<ReachableCell> {
    if radius == 0 || !pos.is_within(grid) {
        return Vec::new();
    }

    let (q0, r0, _) = pos.to_cube();
    let range = radius as i32;
    let mut results = Vec::new();
    for dq in -range..=range {
        for dr in (-range).max(-dq - range)..=range.min(-dq + range) {
            if dq == 0 && dr == 0 {
                continue;
            }
            let cell = Position::from_axial(q0 + dq, r0 + dr);
            if !cell.is_within(grid) {
                continue;
            }
            let distance = pos.distance(&cell);
            results.push(ReachableCell {
                position: cell,
                remaining_budget: radius - distance,
            });
        }
    }

    results.sort_by_key(|c| (radius - c.remaining_budget, c.position));
    results
}

/// Shortest hop sequence from `from` to `to`, excluding `from` and including `to`.
///
/// Column delta is resolved first, one column per hop, then the row delta.
/// Every hop reduces the distance by exactly one, so the path length always
/// equals `hex_distance(from, to)`. Out-of-range endpoints yield an empty path.
pub fn find_path(from: Position, to: Position, grid: &GridConfig) -> Vec<Position> {
    if !from.is_within(grid) || !to.is_within(grid) {
        return Vec::new();
    }

    let distance = from.distance(&to);
    let mut path = Vec::with_capacity(distance as usize);
    let mut current = from;

    for _ in 0..distance {
        let next = if current.col != to.col {
            let next_col = current.col + (to.col - current.col).signum();
            let remaining = current.distance(&to);
            current
                .neighbors()
                .into_iter()
                .filter(|n| n.col == next_col && n.is_within(grid))
                .filter(|n| n.distance(&to) < remaining)
                .min_by_key(|n| ((n.row - to.row).abs(), n.row))
        } else {
            Some(Position::new(
                current.col,
                current.row + (to.row - current.row).signum(),
            ))
        };

        let Some(next) = next else {
            tracing::debug!(%from, %to, "no monotonic hop available");
            return Vec::new();
        };
        path.push(next);
        current = next;
    }

    path
}

/// Point-reflect a cell through the grid center.
///
/// Opponent units are reported in their own frame; this maps them into ours.
pub fn invert_position(pos: Position, grid: &GridConfig) -> Position {
    Position::new(grid.grid_width - 1 - pos.col, grid.grid_height - 1 - pos.row)
}
