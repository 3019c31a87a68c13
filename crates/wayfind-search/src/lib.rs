//! **wayfind-search** — the stepwise, cancellable pathfinding engine.
//!
//! The engine runs A* over a [`wayfind_grid::Grid`] while pacing itself
//! between steps so that an external observer (typically a renderer) can
//! watch the open and closed frontiers grow. Runs are cooperative: a
//! [`wayfind_core::Context`] cancels at any suspension point, and every run
//! ends with exactly one [`SearchOutcome`].
//!
//! | Item | Role |
//! |---|---|
//! | [`Pathfinder`] | the capability any search strategy exposes |
//! | [`AStarPathfinder`] | the one concrete strategy: paced A* |
//! | [`SearchHandle`] | background run: join handle + completion notification |
//! | [`octile`] | the 14/10 fixed-point distance, heuristic and step cost |

pub mod astar;
pub mod distance;
pub mod neighbors;
pub mod pathfinder;

pub use astar::AStarPathfinder;
pub use distance::{DIAGONAL_COST, ORTHOGONAL_COST, octile};
pub use neighbors::Neighbors;
pub use pathfinder::{
    DEFAULT_PACE, EngineError, EngineState, MAX_PACE, MIN_PACE, Pathfinder, SearchHandle,
    SearchOutcome,
};
