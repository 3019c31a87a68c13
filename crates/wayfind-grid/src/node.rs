//! A single grid cell and its search-derived state.

use wayfind_core::Point;

/// One cell of the grid.
///
/// Traversability and position are fixed at materialization; everything else
/// is written by the search engine and wiped by [`reset`](Node::reset). The
/// struct is `Copy`, so handing out snapshots for visualization is a plain
/// value copy that can never alias the live grid state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    traversable: bool,
    pos: Point,
    /// Accumulated cost from the start along the best known path.
    pub g_cost: i32,
    /// Heuristic estimate of the cost to the target.
    pub h_cost: i32,
    /// Back-reference for tracing the winning path, as a coordinate.
    pub parent: Option<Point>,
    pub on_path: bool,
    pub in_open: bool,
    pub in_closed: bool,
}

impl Node {
    /// Create a fresh node with cleared search state.
    pub fn new(traversable: bool, pos: Point) -> Self {
        Self {
            traversable,
            pos,
            g_cost: 0,
            h_cost: 0,
            parent: None,
            on_path: false,
            in_open: false,
            in_closed: false,
        }
    }

    /// Whether the cell can be walked through.
    #[inline]
    pub fn traversable(&self) -> bool {
        self.traversable
    }

    /// The cell's grid coordinate.
    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Total cost, always derived from the two cost fields.
    #[inline]
    pub fn f_cost(&self) -> i32 {
        self.g_cost + self.h_cost
    }

    /// Clear all search-derived fields, leaving position and traversability
    /// untouched.
    pub fn reset(&mut self) {
        self.g_cost = 0;
        self.h_cost = 0;
        self.parent = None;
        self.on_path = false;
        self.in_open = false;
        self.in_closed = false;
    }
}
