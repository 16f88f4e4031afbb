//! Row types returned by the named views.
//!
//! Kernel-level rows (`Burst`, `Spike`, `RatioRow`, `RollingCount`,
//! `RollingSum`) are re-used directly; these are the view-specific shapes.

use serde::{Deserialize, Serialize};

/// One (hour bucket, alert type) cell of the hourly histogram.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyAlertRow {
    /// Formatted bucket label, `YYYY-MM-DD HH:00`.
    pub hour_bucket: String,
    pub alert_type: String,
    pub count: u64,
}

/// Generic leaderboard row keyed by host or source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCountRow {
    pub key: String,
    pub count: u64,
}

/// Windowed byte/packet sums for one bandwidth leader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandwidthRow {
    pub key: String,
    pub bytes: u64,
    pub packets: u64,
}

/// All-time average packet size for one host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvgPacketSizeRow {
    pub key: String,
    pub avg_packet_bytes: f64,
    pub total_packets: u64,
}

/// Peak distinct-destination-port count for one host in the window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanoutRow {
    pub key: String,
    pub unique_dst_ports: u64,
}
