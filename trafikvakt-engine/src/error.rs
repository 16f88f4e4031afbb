//! Error taxonomy for view queries.
//!
//! A store outage must never look like "no activity", so read failures
//! propagate as errors instead of empty rows. Parameter problems are
//! rejected before any aggregation runs. Division by zero in the ratio
//! view is defined behavior (sentinel), never an error.

use thiserror::Error;
use trafikvakt_core::query::QueryError;
use trafikvakt_storage::StorageError;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Store read failed or timed out; surfaced unmodified, no retries here.
    #[error("input unavailable: {0}")]
    InputUnavailable(StorageError),

    /// Rejected before aggregation: non-positive window, zero K, malformed
    /// threshold.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Caller cancelled the query or its deadline passed.
    #[error(transparent)]
    Interrupted(#[from] QueryError),
}

impl From<StorageError> for AnalyticsError {
    fn from(err: StorageError) -> Self {
        match err {
            // A read cut short by the caller's own context is cancellation,
            // not an input outage.
            StorageError::Interrupted(q) => AnalyticsError::Interrupted(q),
            other => AnalyticsError::InputUnavailable(other),
        }
    }
}
