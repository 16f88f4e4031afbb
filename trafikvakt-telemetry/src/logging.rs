//! Structured logging for view queries.
//!
//! One `init` at process start; after that, components log through
//! `tracing` macros and the engine wraps each view call in a span.

use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Install the global subscriber. `RUST_LOG` wins; default level info.
    pub fn init() {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE)
            .init()
    }

    /// Record a completed view query with its row count.
    pub fn log_view(view: &str, rows: usize) {
        info!(view, rows, "view query complete");
    }
}
