//! Rolling-window aggregation.
//!
//! Both modes share the same monotonic two-pointer scan: the head walks the
//! ordered sequence one record at a time while the tail drops records older
//! than `t − W`, so a full materialization is O(n) per key rather than
//! O(n·W). The window is boundary-inclusive: a record qualifies for
//! reference time `t` iff its timestamp lies in `[t − W, t]`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Trailing count at one event's timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingCount {
    pub timestamp: DateTime<Utc>,
    pub count: u64,
}

/// Trailing sum at one interval boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingSum {
    pub boundary: DateTime<Utc>,
    pub sum: u64,
}

/// Per-event rolling count: for each timestamp `t` in the ordered input,
/// how many input timestamps fall in `[t − window, t]`.
///
/// The input must be sorted ascending. Empty input yields empty output.
pub fn rolling_event_counts(timestamps: &[DateTime<Utc>], window: Duration) -> Vec<RollingCount> {
    let mut out = Vec::with_capacity(timestamps.len());
    let mut tail = 0usize;
    for (head, &t) in timestamps.iter().enumerate() {
        let cutoff = t - window;
        while timestamps[tail] < cutoff {
            tail += 1;
        }
        out.push(RollingCount {
            timestamp: t,
            count: (head - tail + 1) as u64,
        });
    }
    out
}

/// Per-boundary rolling sum: for each `(boundary, value)` point in the
/// ordered input, the sum of values whose boundary lies in
/// `[boundary − window, boundary]`.
///
/// Points must be sorted ascending by boundary. A window with no
/// predecessors reports just the point's own value; an empty input reports
/// nothing rather than erroring.
pub fn rolling_interval_sums(
    points: &[(DateTime<Utc>, u64)],
    window: Duration,
) -> Vec<RollingSum> {
    let mut out = Vec::with_capacity(points.len());
    let mut tail = 0usize;
    let mut running: u64 = 0;
    for &(boundary, value) in points {
        running += value;
        let cutoff = boundary - window;
        while points[tail].0 < cutoff {
            running -= points[tail].1;
            tail += 1;
        }
        out.push(RollingSum {
            boundary,
            sum: running,
        });
    }
    out
}
