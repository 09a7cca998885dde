//! Integer grid coordinates and the two distance metrics used by the search.
//!
//! `GridPoint` is the immutable position of a grid cell.  The metrics are
//! pure functions of two points so they can be used both by the graph (edge
//! weights) and by the agents (heuristic, vision radius) without a graph
//! lookup.

use std::f64::consts::SQRT_2;

/// A cell position on an 8-connected grid.  `x` grows to the right, `y`
/// grows downward (row index), matching the MovingAI map layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Octile distance: `(dx + dy) + (√2 - 2) · min(dx, dy)`.
    ///
    /// Exact shortest-path cost on an obstacle-free 8-connected grid with
    /// unit cardinal and √2 diagonal edges, so it never overestimates on a
    /// grid with obstacles.
    #[inline]
    pub fn octile_distance(self, other: GridPoint) -> f64 {
        let dx = (self.x - other.x).unsigned_abs() as f64;
        let dy = (self.y - other.y).unsigned_abs() as f64;
        (dx + dy) + (SQRT_2 - 2.0) * dx.min(dy)
    }

    /// Straight-line distance.
    #[inline]
    pub fn euclidean_distance(self, other: GridPoint) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }

    /// `true` if the two points differ by exactly one step in x and one in y.
    #[inline]
    pub fn is_diagonal_to(self, other: GridPoint) -> bool {
        (self.x - other.x).abs() == 1 && (self.y - other.y).abs() == 1
    }

    /// Inclusive axis-aligned rectangle test.
    #[inline]
    pub fn within(self, min: GridPoint, max: GridPoint) -> bool {
        self.x >= min.x && self.x <= max.x && self.y >= min.y && self.y <= max.y
    }
}

impl std::fmt::Display for GridPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
