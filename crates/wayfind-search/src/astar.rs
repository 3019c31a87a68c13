//! The A* search state machine, paced for visualization.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use log::{debug, info};

use wayfind_core::{Context, Point};
use wayfind_grid::Grid;

use crate::distance::octile;
use crate::neighbors::Neighbors;
use crate::pathfinder::{
    DEFAULT_PACE, EngineError, EngineState, MAX_PACE, MIN_PACE, Pathfinder, SearchHandle,
    SearchOutcome,
};

/// Paced, cancellable A* over a bound [`Grid`].
///
/// One engine drives one search at a time. Toggles are per-instance: two
/// engines never share settings. Progress is observable through the grid's
/// node flags while a run is in flight; the engine itself only reports its
/// lifecycle [`state`](Pathfinder::state) and the node currently being
/// expanded ([`current_node`](AStarPathfinder::current_node)).
pub struct AStarPathfinder {
    grid: Option<Grid>,
    diagonal: bool,
    instant: bool,
    pace: Duration,
    state: Arc<Mutex<EngineState>>,
    running: Arc<AtomicBool>,
    current: Arc<Mutex<Option<Point>>>,
}

impl Default for AStarPathfinder {
    fn default() -> Self {
        Self::new()
    }
}

impl AStarPathfinder {
    /// Create an unbound engine with default settings.
    pub fn new() -> Self {
        Self {
            grid: None,
            diagonal: false,
            instant: false,
            pace: DEFAULT_PACE,
            state: Arc::new(Mutex::new(EngineState::Idle)),
            running: Arc::new(AtomicBool::new(false)),
            current: Arc::new(Mutex::new(None)),
        }
    }

    /// The node being expanded right now, if a run is in flight.
    pub fn current_node(&self) -> Option<Point> {
        *lock(&self.current)
    }

    /// Validate configuration, claim the single run slot, and build the
    /// worker that will actually search.
    fn begin_run(&self) -> Result<Worker, EngineError> {
        let grid = self.grid.clone().ok_or(EngineError::NotConfigured)?;
        if grid.algorithm().is_none() {
            return Err(EngineError::InvalidState);
        }
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(EngineError::Busy);
        }
        *lock(&self.state) = EngineState::Running;
        Ok(Worker {
            start: grid.start(),
            target: grid.target(),
            grid,
            diagonal: self.diagonal,
            instant: self.instant,
            pace: self.pace,
            state: Arc::clone(&self.state),
            running: Arc::clone(&self.running),
            current: Arc::clone(&self.current),
            open: Vec::new(),
            neighbors: Neighbors::new(),
        })
    }
}

impl Pathfinder for AStarPathfinder {
    fn bind_grid(&mut self, grid: Grid) {
        grid.reset_nodes();
        grid.mark_open(grid.start());
        self.grid = Some(grid);
        self.pace = DEFAULT_PACE;
        *lock(&self.state) = EngineState::Idle;
        *lock(&self.current) = None;
    }

    fn diagonal_movement(&self) -> bool {
        self.diagonal
    }

    fn set_diagonal_movement(&mut self, allow: bool) {
        self.diagonal = allow;
    }

    fn instant_pathing(&self) -> bool {
        self.instant
    }

    fn set_instant_pathing(&mut self, instant: bool) {
        self.instant = instant;
    }

    fn pace(&self) -> Duration {
        self.pace
    }

    fn set_pace(&mut self, pace: Duration) {
        self.pace = pace.clamp(MIN_PACE, MAX_PACE);
    }

    fn state(&self) -> EngineState {
        *lock(&self.state)
    }

    fn find_path(&self, ctx: &Context) -> Result<SearchOutcome, EngineError> {
        let worker = self.begin_run()?;
        Ok(worker.run(ctx))
    }

    fn spawn(&self, ctx: Context) -> Result<SearchHandle, EngineError> {
        let worker = self.begin_run()?;
        let (tx, rx) = mpsc::channel();
        let thread = thread::spawn(move || {
            let outcome = worker.run(&ctx);
            // The receiver may be gone; the run itself already finished.
            let _ = tx.send(outcome);
        });
        Ok(SearchHandle {
            thread,
            rx,
            reported: false,
        })
    }

    fn clear_path(&mut self) {
        if let Some(grid) = &self.grid {
            debug!("clearing search state");
            grid.reset_nodes();
            grid.mark_open(grid.start());
        }
        *lock(&self.state) = EngineState::Idle;
        *lock(&self.current) = None;
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/// One run's worth of search state, detached from the engine so it can move
/// onto a worker thread. The engine and the worker share the grid buffer,
/// the lifecycle state, and the run slot.
struct Worker {
    grid: Grid,
    start: Point,
    target: Point,
    diagonal: bool,
    instant: bool,
    pace: Duration,
    state: Arc<Mutex<EngineState>>,
    running: Arc<AtomicBool>,
    current: Arc<Mutex<Option<Point>>>,
    open: Vec<Point>,
    neighbors: Neighbors,
}

impl Worker {
    /// Execute the search to its single terminal outcome and release the
    /// run slot.
    fn run(mut self, ctx: &Context) -> SearchOutcome {
        let size = self.grid.size();
        info!(
            "A* run over {}x{} grid (diagonal: {}, instant: {})",
            size.x, size.y, self.diagonal, self.instant
        );
        let outcome = self.search(ctx);
        *lock(&self.state) = match outcome {
            SearchOutcome::PathFound { .. } => EngineState::Completed,
            SearchOutcome::Unreachable => EngineState::Exhausted,
            SearchOutcome::Cancelled => EngineState::Cancelled,
        };
        *lock(&self.current) = None;
        self.running.store(false, Ordering::Release);
        match &outcome {
            SearchOutcome::PathFound { path, cost } => {
                info!("path found: {} nodes, cost {cost}", path.len());
            }
            SearchOutcome::Unreachable => info!("open set exhausted, target unreachable"),
            SearchOutcome::Cancelled => info!("search cancelled"),
        }
        outcome
    }

    fn search(&mut self, ctx: &Context) -> SearchOutcome {
        // Always start from a clean slate with only the start node open.
        self.grid.reset_nodes();
        self.grid.mark_open(self.start);
        self.open = vec![self.start];

        loop {
            if ctx.is_done() {
                return self.cancelled();
            }

            // Exhaustion is a first-class terminal outcome: with an empty
            // open set there is no further legal state.
            let Some(current) = self.select_current() else {
                return SearchOutcome::Unreachable;
            };
            *lock(&self.current) = Some(current);
            if self.pause(ctx, self.step_pace()) {
                return self.cancelled();
            }

            self.open.retain(|&p| p != current);
            self.grid.move_to_closed(current);
            if self.pause(ctx, self.step_pace()) {
                return self.cancelled();
            }

            if current == self.target {
                return self.trace_solution(ctx);
            }

            let current_g = self
                .grid
                .node_at(current)
                .map(|n| n.g_cost)
                .unwrap_or_default();
            let bounds = self.grid.bounds();
            let candidates: Vec<Point> = self
                .neighbors
                .of(current, self.diagonal, |n| bounds.contains(n))
                .to_vec();

            for np in candidates {
                if ctx.is_done() {
                    return self.cancelled();
                }
                let Some(neighbor) = self.grid.node_at(np) else {
                    continue;
                };
                if !neighbor.traversable() || neighbor.in_closed {
                    continue;
                }

                let tentative_g = current_g + octile(current, np);
                if tentative_g < neighbor.g_cost || !neighbor.in_open {
                    self.grid
                        .set_costs(np, tentative_g, octile(np, self.target), Some(current));
                    if !neighbor.in_open {
                        self.grid.mark_open(np);
                        self.open.push(np);
                    }
                }

                if self.pause(ctx, self.step_pace() / 3) {
                    return self.cancelled();
                }
            }
        }
    }

    /// Lowest-f extraction over the unordered open list.
    ///
    /// Strict `<` keeps the first-encountered node on ties. A single-entry
    /// list (the start node on the very first iteration) is selected
    /// directly, so no degenerate tie-break happens there.
    fn select_current(&self) -> Option<Point> {
        match self.open.as_slice() {
            [] => None,
            [only] => Some(*only),
            [first, rest @ ..] => {
                let mut best = *first;
                let mut best_f = self.f_of(best);
                for &p in rest {
                    let f = self.f_of(p);
                    if f < best_f {
                        best = p;
                        best_f = f;
                    }
                }
                Some(best)
            }
        }
    }

    fn f_of(&self, p: Point) -> i32 {
        self.grid.node_at(p).map(|n| n.f_cost()).unwrap_or(i32::MAX)
    }

    /// Walk parent links back from the target, then mark the path forward
    /// as a distinct, slower visualization phase.
    fn trace_solution(&mut self, ctx: &Context) -> SearchOutcome {
        let mut path = Vec::new();
        let mut p = self.target;
        loop {
            path.push(p);
            if p == self.start {
                break;
            }
            match self.grid.node_at(p).and_then(|n| n.parent) {
                Some(parent) => p = parent,
                None => break,
            }
        }
        path.reverse();

        let cost = self
            .grid
            .node_at(self.target)
            .map(|n| n.g_cost)
            .unwrap_or_default();

        for &step in &path {
            if ctx.is_done() {
                return self.cancelled();
            }
            self.grid.mark_solution(step);
            if self.pause(ctx, self.step_pace() * 2) {
                return self.cancelled();
            }
        }

        SearchOutcome::PathFound { path, cost }
    }

    /// Clear everything so the grid is left clean and re-runnable, then
    /// report the cancelled outcome.
    fn cancelled(&mut self) -> SearchOutcome {
        debug!("cancellation requested, resetting search state");
        self.grid.reset_nodes();
        self.grid.mark_open(self.start);
        self.open = vec![self.start];
        SearchOutcome::Cancelled
    }

    /// Suspend for one paced step, then report whether cancellation fired.
    /// Never blocks longer than the configured pace.
    fn pause(&self, ctx: &Context, d: Duration) -> bool {
        if !d.is_zero() {
            thread::sleep(d);
        }
        ctx.is_done()
    }

    fn step_pace(&self) -> Duration {
        if self.instant { Duration::ZERO } else { self.pace }
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
