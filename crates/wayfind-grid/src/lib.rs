//! **wayfind-grid** — the scenario and grid data model.
//!
//! A [`Scenario`] is an already-decoded description of a rectangular map
//! (this crate does not parse files). [`Grid::from_scenario`] materializes it
//! into a matrix of [`Node`]s, validates it, and exposes read-only snapshots
//! for visualization alongside the targeted mutators a search engine uses to
//! drive costs, flags, and parent links.

pub mod grid;
pub mod node;
pub mod scenario;

pub use grid::{AlgorithmKind, Grid};
pub use node::Node;
pub use scenario::{EMPTY, START, Scenario, ScenarioError, TARGET, WALL};
