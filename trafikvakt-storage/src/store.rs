//! Store traits consumed by the analytics facade.
//!
//! Both stores are append-only from the engine's perspective: ingestion
//! points are owned by the capture/detection pipeline, reads by the views.
//! Reads return time-ordered slices so the aggregation kernels can rely on
//! a single pre-established order.

use chrono::{DateTime, Utc};
use trafikvakt_core::query::QueryCtx;
use trafikvakt_core::records::{AlertEvent, IntervalStat};

use crate::error::StorageError;

/// Access to the discrete alert event set.
pub trait AlertStore: Send + Sync {
    /// Ingestion point for the detection pipeline.
    fn append_alert(&self, event: AlertEvent) -> Result<(), StorageError>;

    /// Alerts with `timestamp` in `[from, to]` (either bound optional),
    /// ordered by `(timestamp, id)`.
    fn alerts_between(
        &self,
        ctx: &QueryCtx,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<AlertEvent>, StorageError>;

    /// Newest alerts first, at most `limit` of them.
    fn recent_alerts(&self, ctx: &QueryCtx, limit: usize) -> Result<Vec<AlertEvent>, StorageError>;
}

/// Access to the per-host interval statistics set.
pub trait IntervalStore: Send + Sync {
    /// Ingestion point for the capture pipeline. Implementations reject
    /// buckets with `interval_start >= interval_end`.
    fn append_interval(&self, stat: IntervalStat) -> Result<(), StorageError>;

    /// Interval stats with `interval_end` in `[from, to]` (either bound
    /// optional), ordered by `(interval_start, host_key, id)`.
    fn intervals_between(
        &self,
        ctx: &QueryCtx,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<IntervalStat>, StorageError>;
}
