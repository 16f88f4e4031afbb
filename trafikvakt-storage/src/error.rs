//! Error types for store access.

use thiserror::Error;
use trafikvakt_core::query::QueryError;

/// Unified store access error.
///
/// Read failures must reach the caller as errors, never as empty result
/// sets, so an outage cannot masquerade as "no activity".
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend unreachable or refused the read.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The query context expired or was cancelled mid-read.
    #[error("store read interrupted: {0}")]
    Interrupted(#[from] QueryError),

    /// Record violates a schema invariant and was rejected at append.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}
