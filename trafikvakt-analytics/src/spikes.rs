//! Step-change detection between a host's consecutive interval buckets.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trafikvakt_core::records::IntervalStat;

/// One flagged step change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spike {
    pub key: String,

    /// Start of the interval in which the jump was observed.
    pub interval_start: DateTime<Utc>,

    pub current: u64,
    pub previous: u64,

    /// `current − previous`, always `>= threshold` for emitted spikes.
    pub delta: u64,
}

/// Compare `metric` between each interval and its immediate predecessor for
/// the same host; flag pairs whose increase meets `threshold`.
///
/// The first interval per host has no predecessor and is excluded outright
/// rather than compared against an implicit zero. Input must be ordered by
/// `interval_start` within each host. Output is ordered by `delta`
/// descending, host key ascending on ties.
pub fn detect_spikes<F>(stats: &[IntervalStat], metric: F, threshold: u64) -> Vec<Spike>
where
    F: Fn(&IntervalStat) -> u64,
{
    let mut per_host: BTreeMap<&str, Vec<&IntervalStat>> = BTreeMap::new();
    for stat in stats {
        per_host.entry(stat.host_key.as_str()).or_default().push(stat);
    }

    let mut out = Vec::new();
    for (host, intervals) in per_host {
        for pair in intervals.windows(2) {
            let previous = metric(pair[0]);
            let current = metric(pair[1]);
            if current > previous && current - previous >= threshold {
                out.push(Spike {
                    key: host.to_string(),
                    interval_start: pair[1].interval_start,
                    current,
                    previous,
                    delta: current - previous,
                });
            }
        }
    }

    out.sort_by(|a, b| b.delta.cmp(&a.delta).then_with(|| a.key.cmp(&b.key)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stat(host: &str, start: i64, unique_src: u64) -> IntervalStat {
        IntervalStat {
            id: start as u64,
            interval_start: Utc.timestamp_opt(start, 0).unwrap(),
            interval_end: Utc.timestamp_opt(start + 60, 0).unwrap(),
            host_key: host.into(),
            total_packets: 0,
            incoming_packets: 0,
            outgoing_packets: 0,
            unique_src_count: unique_src,
            unique_dst_port_count: 0,
            total_bytes: 0,
        }
    }

    #[test]
    fn flags_only_the_qualifying_pair() {
        // [3, 3, 9] with threshold 5: only the 3 -> 9 jump qualifies.
        let stats = vec![stat("H", 0, 3), stat("H", 60, 3), stat("H", 120, 9)];
        let spikes = detect_spikes(&stats, |s| s.unique_src_count, 5);
        assert_eq!(spikes.len(), 1);
        assert_eq!(spikes[0].previous, 3);
        assert_eq!(spikes[0].current, 9);
        assert_eq!(spikes[0].delta, 6);
        assert_eq!(spikes[0].interval_start, Utc.timestamp_opt(120, 0).unwrap());
    }

    #[test]
    fn first_interval_is_never_flagged() {
        // A lone huge first bucket must not be treated as a zero-previous spike.
        let stats = vec![stat("H", 0, 100)];
        assert!(detect_spikes(&stats, |s| s.unique_src_count, 5).is_empty());
    }

    #[test]
    fn decreases_are_ignored() {
        let stats = vec![stat("H", 0, 50), stat("H", 60, 1)];
        assert!(detect_spikes(&stats, |s| s.unique_src_count, 5).is_empty());
    }

    #[test]
    fn output_is_largest_delta_first() {
        let stats = vec![
            stat("a-host", 0, 1),
            stat("a-host", 60, 10),
            stat("b-host", 0, 1),
            stat("b-host", 60, 30),
        ];
        let spikes = detect_spikes(&stats, |s| s.unique_src_count, 5);
        assert_eq!(spikes.len(), 2);
        assert_eq!(spikes[0].key, "b-host");
        assert_eq!(spikes[0].delta, 29);
        assert_eq!(spikes[1].key, "a-host");
    }

    #[test]
    fn hosts_never_compare_against_each_other() {
        // Adjacent-in-time buckets of different hosts are independent series.
        let stats = vec![stat("a-host", 0, 1), stat("b-host", 60, 100)];
        assert!(detect_spikes(&stats, |s| s.unique_src_count, 5).is_empty());
    }
}
