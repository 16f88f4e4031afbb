//! # Trafikvakt Telemetry
//!
//! Logging and metrics for the analytics engine.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
