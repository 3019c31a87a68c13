//! The pathfinding capability: what any search strategy exposes to callers.

use std::fmt;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread::JoinHandle;
use std::time::Duration;

use wayfind_core::{Context, Point};
use wayfind_grid::Grid;

/// Shortest pace worth configuring; below this the frontier is not
/// observable anyway.
pub const MIN_PACE: Duration = Duration::from_millis(5);
/// Longest supported pace.
pub const MAX_PACE: Duration = Duration::from_millis(100);
/// Pace applied when a grid is bound.
pub const DEFAULT_PACE: Duration = Duration::from_millis(25);

/// Terminal outcome of one search run. Every run produces exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchOutcome {
    /// A lowest-cost path was found, listed start to target inclusive.
    PathFound { path: Vec<Point>, cost: i32 },
    /// The open set emptied before the target was reached.
    Unreachable,
    /// Cancellation was requested; all search state has been reset.
    Cancelled,
}

/// Where the engine is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    /// Last run found a path.
    Completed,
    /// Last run was cancelled.
    Cancelled,
    /// Last run exhausted the open set without reaching the target.
    Exhausted,
}

/// Misuse of the engine. These are programmer errors, never retried.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// A run was requested before any grid was bound.
    NotConfigured,
    /// The bound grid has no assigned algorithm; grid and engine must be
    /// mutually wired before running.
    InvalidState,
    /// A run is already in progress on this engine.
    Busy,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "no grid bound to the pathfinder"),
            Self::InvalidState => {
                write!(f, "grid does not have an assigned pathfinding algorithm")
            }
            Self::Busy => write!(f, "a search is already running on this pathfinder"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Handle to a background search run.
///
/// The outcome channel is the completion notification: it receives exactly
/// one [`SearchOutcome`] per run, on normal completion, exhaustion, and
/// cancellation alike.
#[derive(Debug)]
pub struct SearchHandle {
    pub(crate) thread: JoinHandle<()>,
    pub(crate) rx: Receiver<SearchOutcome>,
    pub(crate) reported: bool,
}

impl SearchHandle {
    /// Block until the run finishes and return its outcome.
    pub fn wait(self) -> SearchOutcome {
        // A recv error means the worker died without reporting; treat it as
        // a cancelled run, the only outcome carrying no result.
        let outcome = self.rx.recv().unwrap_or(SearchOutcome::Cancelled);
        let _ = self.thread.join();
        outcome
    }

    /// Non-blocking poll for the outcome. Returns `None` while the run is
    /// still in progress. At most one call ever yields `Some`.
    ///
    /// A worker that dies without reporting (the channel disconnects with no
    /// outcome queued) yields `Cancelled` once, the same fallback as
    /// [`wait`](SearchHandle::wait), so pollers never spin forever.
    pub fn try_outcome(&mut self) -> Option<SearchOutcome> {
        if self.reported {
            return None;
        }
        match self.rx.try_recv() {
            Ok(outcome) => {
                self.reported = true;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.reported = true;
                Some(SearchOutcome::Cancelled)
            }
        }
    }

    /// Whether the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }
}

/// The contract between a search strategy and its callers.
///
/// Only A* exists today ([`AStarPathfinder`](crate::AStarPathfinder)), but
/// the grid and callers only ever see this surface, so strategies can be
/// swapped without touching either.
pub trait Pathfinder {
    /// Bind a grid and reset to a clean, re-runnable state.
    /// Also restores the default pace.
    fn bind_grid(&mut self, grid: Grid);

    /// Whether diagonal steps are allowed during expansion.
    fn diagonal_movement(&self) -> bool;
    fn set_diagonal_movement(&mut self, allow: bool);

    /// Whether pacing is suppressed (every suspension lasts zero time).
    fn instant_pathing(&self) -> bool;
    fn set_instant_pathing(&mut self, instant: bool);

    /// The configured per-step suspension, as a plain duration.
    fn pace(&self) -> Duration;

    /// Set the per-step suspension, clamped into [`MIN_PACE`, `MAX_PACE`].
    /// Use instant pathing to suppress pacing entirely.
    fn set_pace(&mut self, pace: Duration);

    /// Current lifecycle state.
    fn state(&self) -> EngineState;

    /// Run the search on the calling thread, honouring pacing and the
    /// cancellation context, and return the single outcome.
    fn find_path(&self, ctx: &Context) -> Result<SearchOutcome, EngineError>;

    /// Run the search on a background thread. The returned handle carries
    /// the completion notification.
    fn spawn(&self, ctx: Context) -> Result<SearchHandle, EngineError>;

    /// Reset all node search state and frontier sets, returning to `Idle`
    /// from any state. No-op when no grid is bound.
    fn clear_path(&mut self);
}
