//! Prometheus metrics for the analytics engine.

use prometheus::{Counter, Histogram, HistogramOpts, Registry};

/// Registry plus the engine's counters, cloned into every facade.
#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub view_queries: Counter,
    pub view_errors: Counter,
    pub view_latency: Histogram,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();
        let view_queries =
            Counter::new("trafikvakt_view_queries_total", "Total view queries served").unwrap();
        let view_errors =
            Counter::new("trafikvakt_view_errors_total", "View queries that failed").unwrap();

        let view_latency = Histogram::with_opts(
            HistogramOpts::new(
                "trafikvakt_view_latency_seconds",
                "Wall-clock time per view query",
            )
            .buckets(vec![0.001, 0.01, 0.1, 1.0, 10.0]),
        )
        .unwrap();

        registry.register(Box::new(view_queries.clone())).unwrap();
        registry.register(Box::new(view_errors.clone())).unwrap();
        registry.register(Box::new(view_latency.clone())).unwrap();

        Self {
            registry,
            view_queries,
            view_errors,
            view_latency,
        }
    }

    /// Text-encoded snapshot for a scrape endpoint or the CLI.
    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap_or_default())
    }
}
