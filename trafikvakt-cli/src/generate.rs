//! Seeded synthetic dataset generation.
//!
//! Mimics what a small deployment records over a few hours: a handful of
//! monitored hosts with per-minute interval stats, and a stream of alerts
//! from a few attacker sources. Same seed, same dataset.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use trafikvakt_core::records::{AlertEvent, IntervalStat};

use crate::data::Dataset;

const ALERT_TYPES: [&str; 4] = ["Port Scan", "DDoS", "DoS", "SYN Flood"];
const MONITORED_DST: &str = "192.168.1.109";

pub struct GeneratorParams {
    pub seed: u64,
    pub hours: u64,
    pub hosts: usize,
    pub sources: usize,
    pub alerts: usize,
    pub interval_minutes: u64,
    pub end: DateTime<Utc>,
}

pub fn generate(params: &GeneratorParams) -> Dataset {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let start = params.end - Duration::hours(params.hours as i64);

    let host_keys: Vec<String> = (0..params.hosts)
        .map(|i| format!("192.168.1.{}", 10 + i))
        .collect();
    let src_keys: Vec<String> = (0..params.sources)
        .map(|_| {
            format!(
                "{}.{}.{}.{}",
                rng.random_range(1..=223u8),
                rng.random_range(0..=255u8),
                rng.random_range(0..=255u8),
                rng.random_range(1..=254u8)
            )
        })
        .collect();

    let span_secs = (params.end - start).num_seconds().max(1);
    let mut alerts: Vec<AlertEvent> = (0..params.alerts)
        .map(|i| {
            let offset = rng.random_range(0..span_secs);
            let alert_type = *ALERT_TYPES.choose(&mut rng).unwrap_or(&ALERT_TYPES[0]);
            let src = src_keys
                .choose(&mut rng)
                .cloned()
                .unwrap_or_else(|| "10.0.0.1".into());
            AlertEvent {
                id: i as u64 + 1,
                timestamp: start + Duration::seconds(offset),
                alert_type: alert_type.to_string(),
                details: alert_details(&mut rng, alert_type, &src),
                src_key: src,
                dst_key: MONITORED_DST.to_string(),
            }
        })
        .collect();
    alerts.sort_by(|a, b| a.time_order(b));
    // Reassign ids in time order so the insertion-order tiebreak holds.
    for (i, alert) in alerts.iter_mut().enumerate() {
        alert.id = i as u64 + 1;
    }

    let mut intervals = Vec::new();
    let width = Duration::minutes(params.interval_minutes as i64);
    let mut id = 0u64;
    let mut bucket_start = start;
    while bucket_start + width <= params.end {
        let bucket_end = bucket_start + width;
        for host in &host_keys {
            id += 1;
            let total_packets = rng.random_range(1..=500u64);
            let incoming = rng.random_range(0..=total_packets);
            intervals.push(IntervalStat {
                id,
                interval_start: bucket_start,
                interval_end: bucket_end,
                host_key: host.clone(),
                total_packets,
                incoming_packets: incoming,
                outgoing_packets: total_packets - incoming,
                unique_src_count: rng.random_range(1..=20),
                unique_dst_port_count: rng.random_range(0..=20),
                total_bytes: rng.random_range(100..=15_000),
            });
        }
        bucket_start = bucket_end;
    }

    Dataset { alerts, intervals }
}

fn alert_details(rng: &mut StdRng, alert_type: &str, src: &str) -> String {
    match alert_type {
        "Port Scan" => format!(
            "{src} scanned {} ports in {} s",
            rng.random_range(50..=150u32),
            rng.random_range(1..=10u32)
        ),
        "DDoS" => format!(
            "{} sources, {} packets -> {MONITORED_DST} in {} s",
            rng.random_range(20..=100u32),
            rng.random_range(1_000..=5_000u32),
            rng.random_range(5..=20u32)
        ),
        "DoS" => format!(
            "{src} sent {} packets to {MONITORED_DST} in {} s",
            rng.random_range(500..=2_000u32),
            rng.random_range(5..=20u32)
        ),
        _ => format!(
            "{src} opened {} half connections to {MONITORED_DST}",
            rng.random_range(200..=1_000u32)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn params(seed: u64) -> GeneratorParams {
        GeneratorParams {
            seed,
            hours: 2,
            hosts: 3,
            sources: 4,
            alerts: 50,
            interval_minutes: 1,
            end: Utc.timestamp_opt(1_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn same_seed_same_dataset() {
        let a = generate(&params(7));
        let b = generate(&params(7));
        assert_eq!(a.alerts, b.alerts);
        assert_eq!(a.intervals, b.intervals);
    }

    #[test]
    fn alerts_come_out_time_ordered() {
        let dataset = generate(&params(3));
        assert!(dataset
            .alerts
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn intervals_cover_every_host_per_bucket() {
        let p = params(1);
        let dataset = generate(&p);
        // 2 hours of 1-minute buckets, 3 hosts.
        assert_eq!(dataset.intervals.len(), 120 * 3);
        assert!(dataset.intervals.iter().all(|s| s.is_well_formed()));
    }
}
