//! Cooperative cancellation and deadline handling for view queries.
//!
//! A view computation is pure CPU work once its input slice is in memory, so
//! cancellation is cooperative: the engine checks the context at store reads
//! and between per-key aggregations. The flag doubles as an external kill
//! switch for long-lookback queries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("query cancelled by caller")]
    Cancelled,

    #[error("query deadline exceeded")]
    DeadlineExceeded,
}

/// Per-call context carrying the cancel flag and an optional deadline.
///
/// Cloning shares the underlying flag, so a caller can hold one clone and
/// cancel a query running elsewhere.
#[derive(Clone, Debug)]
pub struct QueryCtx {
    cancel: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl QueryCtx {
    /// Context that never cancels and never times out.
    pub fn unbounded() -> Self {
        Self {
            cancel: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// Context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancel: Arc::new(AtomicBool::new(false)),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Request cancellation; takes effect at the next checkpoint.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    /// Checkpoint: error out if cancelled or past the deadline.
    pub fn ensure_active(&self) -> Result<(), QueryError> {
        if self.is_cancelled() {
            return Err(QueryError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() > deadline {
                return Err(QueryError::DeadlineExceeded);
            }
        }
        Ok(())
    }
}

impl Default for QueryCtx {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_ctx_stays_active() {
        let ctx = QueryCtx::unbounded();
        assert!(ctx.ensure_active().is_ok());
    }

    #[test]
    fn cancel_is_observed_via_shared_flag() {
        let ctx = QueryCtx::unbounded();
        let handle = ctx.clone();
        handle.cancel();
        assert_eq!(ctx.ensure_active(), Err(QueryError::Cancelled));
    }

    #[test]
    fn elapsed_deadline_errors() {
        let ctx = QueryCtx::with_timeout(Duration::from_secs(0));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(ctx.ensure_active(), Err(QueryError::DeadlineExceeded));
    }
}
