//! Cooperative cancellation for long-running searches.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A simple cooperative-cancellation token backed by an [`AtomicBool`].
///
/// Cloning yields another handle to the same token, so the caller keeps one
/// clone and hands another to the search task. Cancellation is one-directional
/// and idempotent: once cancelled, a context stays cancelled.
#[derive(Clone, Debug, Default)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clean() {
        let ctx = Context::new();
        assert!(!ctx.is_done());
    }

    #[test]
    fn cancel_is_visible_through_clones() {
        let ctx = Context::new();
        let other = ctx.clone();
        ctx.cancel();
        assert!(other.is_done());
    }

    #[test]
    fn cancel_is_idempotent() {
        let ctx = Context::new();
        ctx.cancel();
        ctx.cancel();
        assert!(ctx.is_done());
    }
}
