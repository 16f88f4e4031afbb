//! Input record types produced by the capture/detection pipeline.
//!
//! Both records are immutable once written; the engine only ever reads them.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discrete security alert emitted by the detection pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Insertion-order identifier, the tiebreak for identical timestamps.
    pub id: u64,

    pub timestamp: DateTime<Utc>,

    /// Classifier label, e.g. "DDoS" or "Port Scan".
    pub alert_type: String,

    /// Offending source (host address or comparable key).
    pub src_key: String,

    /// Targeted destination.
    pub dst_key: String,

    /// Free-form context from the classifier.
    pub details: String,
}

impl AlertEvent {
    /// Total order: timestamp first, insertion id breaks ties.
    ///
    /// Rolling-window and burst computations rely on this order being total
    /// so their output is deterministic for identical store contents.
    pub fn time_order(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then(self.id.cmp(&other.id))
    }
}

/// Pre-aggregated per-host traffic counters for one interval bucket.
///
/// Buckets for the same host are contiguous and never overlap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalStat {
    pub id: u64,
    pub interval_start: DateTime<Utc>,
    pub interval_end: DateTime<Utc>,

    /// The monitored host this bucket belongs to.
    pub host_key: String,

    pub total_packets: u64,
    pub incoming_packets: u64,
    pub outgoing_packets: u64,

    /// Distinct source addresses seen contacting the host.
    pub unique_src_count: u64,

    /// Distinct destination ports the host contacted (fan-out).
    pub unique_dst_port_count: u64,

    pub total_bytes: u64,
}

impl IntervalStat {
    /// Order by interval start, then host, then id for a total order.
    pub fn time_order(&self, other: &Self) -> Ordering {
        self.interval_start
            .cmp(&other.interval_start)
            .then_with(|| self.host_key.cmp(&other.host_key))
            .then(self.id.cmp(&other.id))
    }

    /// A bucket is well-formed when it spans a positive duration.
    pub fn is_well_formed(&self) -> bool {
        self.interval_start < self.interval_end
    }
}
