//! Engine-wide configuration parameters.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Parameters that apply to every view rather than any single one.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct EngineConfig {
    /// Width of an interval bucket as produced by the capture pipeline
    /// (seconds). Must match the producer or rolling sums skew.
    #[serde(default = "default_interval_width")]
    #[validate(custom(function = validation::validate_positive_secs))]
    pub interval_width_secs: u64,

    /// TTL for the memoized rolling-total materialization (seconds).
    /// 0 disables the cache. Never invalidated manually: new records
    /// arrive continuously, so only time bounds staleness.
    #[serde(default = "default_cache_ttl")]
    #[validate(range(max = 300))]
    pub cache_ttl_secs: u64,

    /// Default wall-clock budget for a single view query (seconds).
    #[serde(default = "default_query_timeout")]
    #[validate(range(min = 1, max = 600))]
    pub query_timeout_secs: u64,
}

fn default_interval_width() -> u64 {
    60
}

fn default_cache_ttl() -> u64 {
    5
}

fn default_query_timeout() -> u64 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interval_width_secs: default_interval_width(),
            cache_ttl_secs: default_cache_ttl(),
            query_timeout_secs: default_query_timeout(),
        }
    }
}
