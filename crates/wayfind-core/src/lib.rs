//! **wayfind-core** — foundational types for the wayfind pathfinding engine.
//!
//! Provides the geometry primitives shared by the grid and search crates
//! ([`Point`], [`Range`]) and the cooperative-cancellation token ([`Context`])
//! used to stop a running search from another thread.

pub mod context;
pub mod geom;

pub use context::Context;
pub use geom::{Point, Range};
