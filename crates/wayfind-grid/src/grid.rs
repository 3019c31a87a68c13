//! The [`Grid`] type — a validated 2D matrix of [`Node`]s with view semantics.
//!
//! A `Grid` is a *view* into a shared backing buffer. Cloning a `Grid` yields
//! another view of the **same** storage, so a search engine can own one view
//! on a worker thread while a renderer polls snapshots through another. Every
//! read or write takes the buffer lock for the duration of one operation, so
//! readers never observe a half-written node.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use wayfind_core::{Point, Range};

use crate::node::Node;
use crate::scenario::{EMPTY, START, Scenario, ScenarioError, TARGET, WALL};

/// The search strategy assigned to a grid.
///
/// A grid must have an algorithm assigned before an engine runs on it; the
/// engine checks this hook and refuses to start otherwise.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AlgorithmKind {
    AStar,
}

// ---------------------------------------------------------------------------
// Internal shared buffer
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct NodeBuffer {
    nodes: Vec<Node>,
    width: usize,
    height: usize,
    algorithm: Option<AlgorithmKind>,
}

impl NodeBuffer {
    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height {
            Some((p.y as usize) * self.width + (p.x as usize))
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A validated grid of [`Node`]s backed by shared storage.
///
/// Cloning produces another view into the same buffer. Shape is immutable
/// after materialization: editing cell types means deriving a new
/// [`Scenario`] (see [`to_scenario`](Grid::to_scenario)) and building a new
/// grid from it.
#[derive(Debug, Clone)]
pub struct Grid {
    buffer: Arc<RwLock<NodeBuffer>>,
    size: Point,
    start: Point,
    target: Point,
    node_size: f32,
    origin: (f32, f32),
    title: String,
    author: String,
    created: String,
}

impl Grid {
    /// Materialize a grid from a scenario, scanning its character matrix row
    /// by row and validating shape, alphabet, and start/target cardinality.
    ///
    /// `node_size` is the physical edge length of one cell, used only for
    /// coordinate mapping ([`cell_at`](Grid::cell_at)); it is irrelevant to
    /// the search itself.
    pub fn from_scenario(scenario: &Scenario, node_size: f32) -> Result<Self, ScenarioError> {
        let height = scenario.rows.len();
        let width = scenario.rows.first().map_or(0, |r| r.chars().count());
        if width * height < 3 {
            return Err(ScenarioError::TooSmall {
                width: width as i32,
                height: height as i32,
            });
        }

        let mut nodes = Vec::with_capacity(width * height);
        let mut start = None;
        let mut target = None;

        for (y, row) in scenario.rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(ScenarioError::InconsistentWidth { row: y });
            }
            for (x, ch) in row.chars().enumerate() {
                let pos = Point::new(x as i32, y as i32);
                let node = match ch {
                    EMPTY => Node::new(true, pos),
                    WALL => Node::new(false, pos),
                    START => {
                        if start.replace(pos).is_some() {
                            return Err(ScenarioError::DuplicateStart(pos));
                        }
                        Node::new(true, pos)
                    }
                    TARGET => {
                        if target.replace(pos).is_some() {
                            return Err(ScenarioError::DuplicateTarget(pos));
                        }
                        Node::new(true, pos)
                    }
                    ch => return Err(ScenarioError::UnknownSymbol { ch, pos }),
                };
                nodes.push(node);
            }
        }

        let start = start.ok_or(ScenarioError::MissingStart)?;
        let target = target.ok_or(ScenarioError::MissingTarget)?;

        Ok(Self {
            buffer: Arc::new(RwLock::new(NodeBuffer {
                nodes,
                width,
                height,
                algorithm: None,
            })),
            size: Point::new(width as i32, height as i32),
            start,
            target,
            node_size,
            origin: (0.0, 0.0),
            title: scenario.title.clone(),
            author: scenario.author.clone(),
            created: scenario.created.clone(),
        })
    }

    // -----------------------------------------------------------------------
    // Shape and metadata
    // -----------------------------------------------------------------------

    /// Node counts along each axis.
    #[inline]
    pub fn size(&self) -> Point {
        self.size
    }

    /// The grid's bounding range.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.size.x, self.size.y)
    }

    /// The unique start cell.
    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    /// The unique target cell.
    #[inline]
    pub fn target(&self) -> Point {
        self.target
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn created(&self) -> &str {
        &self.created
    }

    // -----------------------------------------------------------------------
    // Physical mapping
    // -----------------------------------------------------------------------

    /// Physical edge length of one cell.
    #[inline]
    pub fn node_size(&self) -> f32 {
        self.node_size
    }

    /// Physical size of the whole grid.
    pub fn grid_size(&self) -> (f32, f32) {
        (
            self.size.x as f32 * self.node_size,
            self.size.y as f32 * self.node_size,
        )
    }

    /// Move the grid's physical origin (top-left corner).
    pub fn set_origin(&mut self, x: f32, y: f32) {
        self.origin = (x, y);
    }

    /// The grid's physical origin.
    #[inline]
    pub fn origin(&self) -> (f32, f32) {
        self.origin
    }

    /// Map a continuous position to the cell under it.
    ///
    /// Returns `None` outside the occupied physical area; positions on the
    /// boundary are clamped to the nearest cell. Used by input handling to
    /// report hover state, never by the search.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<Point> {
        let (ox, oy) = self.origin;
        let (w, h) = self.grid_size();
        if x < ox || x > ox + w || y < oy || y > oy + h {
            return None;
        }
        let cx = ((x - ox) / self.node_size) as i32;
        let cy = ((y - oy) / self.node_size) as i32;
        Some(Point::new(
            cx.clamp(0, self.size.x - 1),
            cy.clamp(0, self.size.y - 1),
        ))
    }

    // -----------------------------------------------------------------------
    // Algorithm hook
    // -----------------------------------------------------------------------

    /// Assign the search strategy that will run on this grid.
    pub fn assign_algorithm(&self, kind: AlgorithmKind) {
        self.write().algorithm = Some(kind);
    }

    /// The currently assigned search strategy, if any.
    pub fn algorithm(&self) -> Option<AlgorithmKind> {
        self.read().algorithm
    }

    // -----------------------------------------------------------------------
    // Read-only visualization surface
    // -----------------------------------------------------------------------

    /// Snapshot of the node at `p`, or `None` outside bounds.
    pub fn node_at(&self, p: Point) -> Option<Node> {
        let buf = self.read();
        buf.index(p).map(|i| buf.nodes[i])
    }

    /// Row-major snapshot of every node.
    pub fn snapshot(&self) -> Vec<Node> {
        self.read().nodes.clone()
    }

    /// Positions currently flagged as open.
    pub fn open_nodes(&self) -> Vec<Point> {
        self.collect(|n| n.in_open)
    }

    /// Positions currently flagged as closed.
    pub fn closed_nodes(&self) -> Vec<Point> {
        self.collect(|n| n.in_closed)
    }

    /// Positions marked as part of the winning path, in row-major order.
    pub fn solution(&self) -> Vec<Point> {
        self.collect(|n| n.on_path)
    }

    fn collect(&self, keep: impl Fn(&Node) -> bool) -> Vec<Point> {
        self.read()
            .nodes
            .iter()
            .filter(|n| keep(n))
            .map(|n| n.pos())
            .collect()
    }

    /// Derive a scenario from the current cell types, reproducing the
    /// character matrix the grid was built from. This is the rebuild path for
    /// editors: derive, modify, materialize a fresh grid.
    pub fn to_scenario(&self) -> Scenario {
        let buf = self.read();
        let mut rows = Vec::with_capacity(buf.height);
        for y in 0..buf.height {
            let mut row = String::with_capacity(buf.width);
            for x in 0..buf.width {
                let n = &buf.nodes[y * buf.width + x];
                row.push(if n.pos() == self.start {
                    START
                } else if n.pos() == self.target {
                    TARGET
                } else if !n.traversable() {
                    WALL
                } else {
                    EMPTY
                });
            }
            rows.push(row);
        }
        Scenario::new(
            self.title.clone(),
            self.author.clone(),
            self.created.clone(),
            rows,
        )
    }

    // -----------------------------------------------------------------------
    // Search-engine mutators
    // -----------------------------------------------------------------------
    //
    // These are the only ways search state changes. Each one takes the write
    // lock for a single whole-node update, which is what makes concurrent
    // snapshots consistent: a node is either fully updated or not at all.

    /// Reset every node's search-derived state.
    pub fn reset_nodes(&self) {
        for node in &mut self.write().nodes {
            node.reset();
        }
    }

    /// Record `g`/`h` costs and the parent link on the node at `p`.
    /// `f_cost` stays derived; there is nothing else to store.
    pub fn set_costs(&self, p: Point, g: i32, h: i32, parent: Option<Point>) {
        let mut buf = self.write();
        if let Some(i) = buf.index(p) {
            let n = &mut buf.nodes[i];
            n.g_cost = g;
            n.h_cost = h;
            n.parent = parent;
        }
    }

    /// Flag the node at `p` as a member of the open set.
    pub fn mark_open(&self, p: Point) {
        let mut buf = self.write();
        if let Some(i) = buf.index(p) {
            buf.nodes[i].in_open = true;
        }
    }

    /// Move the node at `p` from the open set to the closed set.
    /// Both flags flip under one lock, so no reader sees it in both.
    pub fn move_to_closed(&self, p: Point) {
        let mut buf = self.write();
        if let Some(i) = buf.index(p) {
            let n = &mut buf.nodes[i];
            n.in_open = false;
            n.in_closed = true;
        }
    }

    /// Flag the node at `p` as part of the winning path.
    pub fn mark_solution(&self, p: Point) {
        let mut buf = self.write();
        if let Some(i) = buf.index(p) {
            buf.nodes[i].on_path = true;
        }
    }

    // -----------------------------------------------------------------------
    // Lock helpers
    // -----------------------------------------------------------------------

    fn read(&self) -> RwLockReadGuard<'_, NodeBuffer> {
        self.buffer.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, NodeBuffer> {
        self.buffer.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(rows: &[&str]) -> Scenario {
        Scenario::new(
            "test",
            "tester",
            "2024-05-01",
            rows.iter().map(|r| r.to_string()).collect(),
        )
    }

    #[test]
    fn materialize_basic() {
        let g = Grid::from_scenario(&scenario(&["S.#", "..T"]), 10.0).unwrap();
        assert_eq!(g.size(), Point::new(3, 2));
        assert_eq!(g.start(), Point::new(0, 0));
        assert_eq!(g.target(), Point::new(2, 1));
        assert!(g.node_at(Point::new(0, 0)).unwrap().traversable());
        assert!(!g.node_at(Point::new(2, 0)).unwrap().traversable());
        assert!(g.node_at(Point::new(3, 0)).is_none());
        assert_eq!(g.title(), "test");
    }

    #[test]
    fn materialize_rejects_unknown_symbol() {
        let err = Grid::from_scenario(&scenario(&["S.T", ".x."]), 10.0).unwrap_err();
        assert_eq!(
            err,
            ScenarioError::UnknownSymbol {
                ch: 'x',
                pos: Point::new(1, 1)
            }
        );
    }

    #[test]
    fn materialize_rejects_missing_start() {
        let err = Grid::from_scenario(&scenario(&["..T", "..."]), 10.0).unwrap_err();
        assert_eq!(err, ScenarioError::MissingStart);
    }

    #[test]
    fn materialize_rejects_missing_target() {
        let err = Grid::from_scenario(&scenario(&["..S", "..."]), 10.0).unwrap_err();
        assert_eq!(err, ScenarioError::MissingTarget);
    }

    #[test]
    fn materialize_rejects_duplicates() {
        let err = Grid::from_scenario(&scenario(&["SS", ".T"]), 10.0).unwrap_err();
        assert_eq!(err, ScenarioError::DuplicateStart(Point::new(1, 0)));
        let err = Grid::from_scenario(&scenario(&["ST", ".T"]), 10.0).unwrap_err();
        assert_eq!(err, ScenarioError::DuplicateTarget(Point::new(1, 1)));
    }

    #[test]
    fn materialize_rejects_ragged_rows() {
        let err = Grid::from_scenario(&scenario(&["S.T", ".."]), 10.0).unwrap_err();
        assert_eq!(err, ScenarioError::InconsistentWidth { row: 1 });
    }

    #[test]
    fn materialize_rejects_too_small() {
        let err = Grid::from_scenario(&scenario(&["ST"]), 10.0).unwrap_err();
        assert_eq!(err, ScenarioError::TooSmall { width: 2, height: 1 });
        let err = Grid::from_scenario(&scenario(&[]), 10.0).unwrap_err();
        assert_eq!(err, ScenarioError::TooSmall { width: 0, height: 0 });
    }

    #[test]
    fn three_by_one_wall_corridor_is_valid() {
        // The smallest interesting scenario: unreachable target behind a wall.
        let g = Grid::from_scenario(&scenario(&["S#T"]), 10.0).unwrap();
        assert_eq!(g.size(), Point::new(3, 1));
        assert!(!g.node_at(Point::new(1, 0)).unwrap().traversable());
    }

    #[test]
    fn scenario_round_trip() {
        let rows = ["S..", ".#.", "..T"];
        let g = Grid::from_scenario(&scenario(&rows), 10.0).unwrap();
        let derived = g.to_scenario();
        assert_eq!(derived.rows, rows.iter().map(|r| r.to_string()).collect::<Vec<_>>());
        assert_eq!(derived.title, "test");
        assert_eq!(derived.created, "2024-05-01");
    }

    #[test]
    fn round_trip_survives_a_search_pass() {
        // Search-derived state must not leak into the derived scenario.
        let rows = ["S..", ".#.", "..T"];
        let g = Grid::from_scenario(&scenario(&rows), 10.0).unwrap();
        g.mark_open(Point::new(1, 0));
        g.move_to_closed(Point::new(0, 0));
        g.set_costs(Point::new(1, 0), 10, 24, Some(Point::new(0, 0)));
        g.mark_solution(Point::new(1, 0));
        let derived = g.to_scenario();
        assert_eq!(derived.rows, rows.iter().map(|r| r.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn clones_share_storage() {
        let g = Grid::from_scenario(&scenario(&["S.T"]), 10.0).unwrap();
        let view = g.clone();
        g.mark_open(Point::new(1, 0));
        assert!(view.node_at(Point::new(1, 0)).unwrap().in_open);
    }

    #[test]
    fn snapshots_are_detached_copies() {
        let g = Grid::from_scenario(&scenario(&["S.T"]), 10.0).unwrap();
        let mut snap = g.node_at(Point::new(1, 0)).unwrap();
        snap.g_cost = 999;
        snap.in_open = true;
        let live = g.node_at(Point::new(1, 0)).unwrap();
        assert_eq!(live.g_cost, 0);
        assert!(!live.in_open);
    }

    #[test]
    fn reset_nodes_clears_everything() {
        let g = Grid::from_scenario(&scenario(&["S.T"]), 10.0).unwrap();
        g.mark_open(Point::new(0, 0));
        g.move_to_closed(Point::new(1, 0));
        g.set_costs(Point::new(2, 0), 20, 0, Some(Point::new(1, 0)));
        g.mark_solution(Point::new(2, 0));
        g.reset_nodes();
        for n in g.snapshot() {
            assert_eq!(n.g_cost, 0);
            assert_eq!(n.h_cost, 0);
            assert_eq!(n.parent, None);
            assert!(!n.in_open && !n.in_closed && !n.on_path);
        }
        assert!(g.open_nodes().is_empty());
        assert!(g.closed_nodes().is_empty());
        assert!(g.solution().is_empty());
    }

    #[test]
    fn open_closed_membership_is_exclusive() {
        let g = Grid::from_scenario(&scenario(&["S.T"]), 10.0).unwrap();
        let p = Point::new(1, 0);
        g.mark_open(p);
        assert_eq!(g.open_nodes(), vec![p]);
        g.move_to_closed(p);
        assert!(g.open_nodes().is_empty());
        assert_eq!(g.closed_nodes(), vec![p]);
    }

    #[test]
    fn algorithm_hook() {
        let g = Grid::from_scenario(&scenario(&["S.T"]), 10.0).unwrap();
        assert_eq!(g.algorithm(), None);
        g.assign_algorithm(AlgorithmKind::AStar);
        assert_eq!(g.algorithm(), Some(AlgorithmKind::AStar));
        // Visible through clones: the hook lives in the shared buffer.
        assert_eq!(g.clone().algorithm(), Some(AlgorithmKind::AStar));
    }

    #[test]
    fn cell_at_maps_and_clamps() {
        let mut g = Grid::from_scenario(&scenario(&["S..", "..T"]), 10.0).unwrap();
        g.set_origin(100.0, 50.0);
        assert_eq!(g.grid_size(), (30.0, 20.0));
        assert_eq!(g.cell_at(105.0, 55.0), Some(Point::new(0, 0)));
        assert_eq!(g.cell_at(125.0, 65.0), Some(Point::new(2, 1)));
        // On the far boundary: clamped to the last cell.
        assert_eq!(g.cell_at(130.0, 70.0), Some(Point::new(2, 1)));
        // Outside the occupied area.
        assert_eq!(g.cell_at(99.0, 55.0), None);
        assert_eq!(g.cell_at(131.0, 55.0), None);
        assert_eq!(g.cell_at(105.0, 71.0), None);
    }
}
