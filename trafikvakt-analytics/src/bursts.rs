//! Burst clustering by inter-arrival gap.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Maximal run of same-key events with no internal gap over the threshold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Burst {
    pub key: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub count: u64,
}

/// Cluster one key's time-ordered event sequence into bursts.
///
/// A gap strictly greater than `gap` between consecutive events closes the
/// open burst; bursts smaller than `min_size` are dropped at emission, so an
/// isolated event is never promoted to a burst. Single pass, O(n).
pub fn cluster_bursts(
    key: &str,
    timestamps: &[DateTime<Utc>],
    gap: Duration,
    min_size: u64,
) -> Vec<Burst> {
    let mut out = Vec::new();
    let mut open: Option<(DateTime<Utc>, DateTime<Utc>, u64)> = None;

    for &t in timestamps {
        open = match open {
            Some((start, end, count)) if t - end <= gap => Some((start, t, count + 1)),
            Some((start, end, count)) => {
                emit(&mut out, key, start, end, count, min_size);
                Some((t, t, 1))
            }
            None => Some((t, t, 1)),
        };
    }
    if let Some((start, end, count)) = open {
        emit(&mut out, key, start, end, count, min_size);
    }
    out
}

fn emit(
    out: &mut Vec<Burst>,
    key: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    count: u64,
    min_size: u64,
) {
    if count >= min_size {
        out.push(Burst {
            key: key.to_string(),
            start,
            end,
            count,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn undersized_runs_are_filtered() {
        // gap 10->45 is 35s > 30s: two runs of size 2, both below min_size 3.
        let input = vec![ts(0), ts(10), ts(45), ts(50)];
        let bursts = cluster_bursts("10.0.0.1", &input, Duration::seconds(30), 3);
        assert!(bursts.is_empty());
    }

    #[test]
    fn qualifying_run_is_reported_with_extent() {
        let input = vec![ts(0), ts(10), ts(20), ts(300)];
        let bursts = cluster_bursts("10.0.0.1", &input, Duration::seconds(30), 3);
        assert_eq!(bursts.len(), 1);
        assert_eq!(bursts[0].start, ts(0));
        assert_eq!(bursts[0].end, ts(20));
        assert_eq!(bursts[0].count, 3);
    }

    #[test]
    fn isolated_event_never_forms_a_burst() {
        let bursts = cluster_bursts("10.0.0.1", &[ts(0)], Duration::seconds(30), 3);
        assert!(bursts.is_empty());
    }

    #[test]
    fn distant_runs_never_merge() {
        // Two qualifying runs separated by more than the gap.
        let input = vec![ts(0), ts(5), ts(10), ts(500), ts(505), ts(510)];
        let bursts = cluster_bursts("10.0.0.1", &input, Duration::seconds(30), 3);
        assert_eq!(bursts.len(), 2);
        assert_eq!((bursts[0].start, bursts[0].end), (ts(0), ts(10)));
        assert_eq!((bursts[1].start, bursts[1].end), (ts(500), ts(510)));
    }

    #[test]
    fn gap_exactly_at_threshold_stays_in_burst() {
        let input = vec![ts(0), ts(30), ts(60)];
        let bursts = cluster_bursts("10.0.0.1", &input, Duration::seconds(30), 3);
        assert_eq!(bursts.len(), 1);
        assert_eq!(bursts[0].count, 3);
    }

    proptest! {
        // No reported burst may contain an internal gap over the threshold,
        // nor fewer than min_size events.
        #[test]
        fn bursts_respect_gap_and_size(
            mut offsets in proptest::collection::vec(0i64..50_000, 0..64),
            gap_secs in 1i64..1_000,
            min_size in 1u64..6,
        ) {
            offsets.sort_unstable();
            let input: Vec<_> = offsets.iter().map(|&o| ts(o)).collect();
            let gap = Duration::seconds(gap_secs);

            for burst in cluster_bursts("k", &input, gap, min_size) {
                prop_assert!(burst.count >= min_size);
                let inside: Vec<_> = input.iter()
                    .filter(|&&t| t >= burst.start && t <= burst.end)
                    .collect();
                prop_assert_eq!(inside.len() as u64, burst.count);
                for pair in inside.windows(2) {
                    prop_assert!(*pair[1] - *pair[0] <= gap);
                }
            }
        }
    }
}
