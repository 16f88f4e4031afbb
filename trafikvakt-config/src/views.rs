//! Per-view default windows and thresholds.
//!
//! The observed dashboard queries disagreed on lookbacks for nominally
//! identical computations (10 minutes here, 30 there, 24 hours elsewhere).
//! Each default is therefore a named, validated field rather than a hidden
//! constant; whoever owns production defaults decides the final values.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Default parameters for the named analytic views.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ViewDefaults {
    /// Lookback for the hourly alert histogram (hours).
    #[validate(range(min = 1, max = 168))]
    #[serde(default = "default_histogram_lookback_hours")]
    pub histogram_lookback_hours: u64,

    /// Leaderboard size for alert sources.
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_top_sources_limit")]
    pub top_sources_limit: usize,

    /// Trailing window for the rolling alert count (seconds).
    #[validate(custom(function = validation::validate_positive_secs))]
    #[serde(default = "default_rolling_alert_window")]
    pub rolling_alert_window_secs: u64,

    /// Alert type the rolling count tracks by default.
    #[serde(default = "default_rolling_alert_type")]
    pub rolling_alert_type: String,

    /// Maximum inter-arrival gap inside a scan burst (seconds).
    #[validate(custom(function = validation::validate_positive_secs))]
    #[serde(default = "default_burst_gap")]
    pub burst_gap_secs: u64,

    /// Minimum events for a run to count as a burst.
    #[validate(range(min = 2))]
    #[serde(default = "default_burst_min_size")]
    pub burst_min_size: u64,

    /// Trailing window for the bandwidth leaderboard (seconds).
    #[validate(custom(function = validation::validate_positive_secs))]
    #[serde(default = "default_bandwidth_window")]
    pub bandwidth_window_secs: u64,

    /// Leaderboard size for bandwidth takers.
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_bandwidth_limit")]
    pub bandwidth_limit: usize,

    /// Trailing window for the heavy-outgoing ratio check (seconds).
    #[validate(custom(function = validation::validate_positive_secs))]
    #[serde(default = "default_heavy_window")]
    pub heavy_window_secs: u64,

    /// Default out/in multiplier for the CLI report. Deployments disagree
    /// on this value (1.0 and 2.0 both observed), so the engine API takes
    /// it per call.
    #[validate(custom(function = validation::validate_multiplier))]
    #[serde(default = "default_heavy_multiplier")]
    pub heavy_ratio_multiplier: f64,

    /// Trailing window for the port fan-out check (seconds).
    #[validate(custom(function = validation::validate_positive_secs))]
    #[serde(default = "default_fanout_window")]
    pub fanout_window_secs: u64,

    /// Minimum distinct destination ports to report a host.
    #[validate(range(min = 1))]
    #[serde(default = "default_fanout_min_ports")]
    pub fanout_min_ports: u64,

    /// Leaderboard size for fan-out offenders.
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_fanout_limit")]
    pub fanout_limit: usize,

    /// Trailing window for new-source spike detection (seconds).
    #[validate(custom(function = validation::validate_positive_secs))]
    #[serde(default = "default_spike_window")]
    pub spike_window_secs: u64,

    /// Minimum unique-source jump between consecutive buckets.
    #[validate(range(min = 1))]
    #[serde(default = "default_spike_threshold")]
    pub spike_threshold: u64,

    /// Trailing window for the rolling packet total (seconds).
    #[validate(custom(function = validation::validate_positive_secs))]
    #[serde(default = "default_rolling_packet_window")]
    pub rolling_packet_window_secs: u64,

    /// Row count for the recent-alerts listing.
    #[validate(range(min = 1, max = 1000))]
    #[serde(default = "default_recent_alerts_limit")]
    pub recent_alerts_limit: usize,
}

fn default_histogram_lookback_hours() -> u64 {
    24
}

fn default_top_sources_limit() -> usize {
    10
}

fn default_rolling_alert_window() -> u64 {
    600
}

fn default_rolling_alert_type() -> String {
    "DDoS".into()
}

fn default_burst_gap() -> u64 {
    30
}

fn default_burst_min_size() -> u64 {
    3
}

fn default_bandwidth_window() -> u64 {
    600
}

fn default_bandwidth_limit() -> usize {
    5
}

fn default_heavy_window() -> u64 {
    600
}

fn default_heavy_multiplier() -> f64 {
    1.0
}

fn default_fanout_window() -> u64 {
    600
}

fn default_fanout_min_ports() -> u64 {
    20
}

fn default_fanout_limit() -> usize {
    10
}

fn default_spike_window() -> u64 {
    3600
}

fn default_spike_threshold() -> u64 {
    5
}

fn default_rolling_packet_window() -> u64 {
    1800
}

fn default_recent_alerts_limit() -> usize {
    10
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            histogram_lookback_hours: default_histogram_lookback_hours(),
            top_sources_limit: default_top_sources_limit(),
            rolling_alert_window_secs: default_rolling_alert_window(),
            rolling_alert_type: default_rolling_alert_type(),
            burst_gap_secs: default_burst_gap(),
            burst_min_size: default_burst_min_size(),
            bandwidth_window_secs: default_bandwidth_window(),
            bandwidth_limit: default_bandwidth_limit(),
            heavy_window_secs: default_heavy_window(),
            heavy_ratio_multiplier: default_heavy_multiplier(),
            fanout_window_secs: default_fanout_window(),
            fanout_min_ports: default_fanout_min_ports(),
            fanout_limit: default_fanout_limit(),
            spike_window_secs: default_spike_window(),
            spike_threshold: default_spike_threshold(),
            rolling_packet_window_secs: default_rolling_packet_window(),
            recent_alerts_limit: default_recent_alerts_limit(),
        }
    }
}
