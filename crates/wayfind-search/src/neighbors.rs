//! Neighbor enumeration.
//!
//! Adjacency policy is a search concern: the grid only answers bounds
//! queries, and the engine decides whether diagonals are allowed.

use wayfind_core::Point;

/// Cached neighbor computation helper.
///
/// Enumerates cardinal (4-way) or all (8-way) neighbors of a cell, filtered
/// by a predicate, reusing one internal buffer across calls.
#[derive(Default)]
pub struct Neighbors {
    buf: Vec<Point>,
}

impl Neighbors {
    /// Create a new `Neighbors` helper.
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(8),
        }
    }

    /// The 4-directional (cardinal) neighbors of `p` for which `keep`
    /// returns `true`.
    pub fn cardinal(&mut self, p: Point, keep: impl Fn(Point) -> bool) -> &[Point] {
        self.buf.clear();
        for n in p.neighbors_4() {
            if keep(n) {
                self.buf.push(n);
            }
        }
        &self.buf
    }

    /// The 8-directional neighbors of `p` for which `keep` returns `true`.
    pub fn all(&mut self, p: Point, keep: impl Fn(Point) -> bool) -> &[Point] {
        self.buf.clear();
        for n in p.neighbors_8() {
            if keep(n) {
                self.buf.push(n);
            }
        }
        &self.buf
    }

    /// Neighbors of `p` under the given diagonal policy.
    pub fn of(&mut self, p: Point, diagonal: bool, keep: impl Fn(Point) -> bool) -> &[Point] {
        if diagonal {
            self.all(p, keep)
        } else {
            self.cardinal(p, keep)
        }
    }
}
