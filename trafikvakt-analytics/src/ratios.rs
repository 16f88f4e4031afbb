//! Directional traffic ratios over a window of interval buckets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use trafikvakt_core::records::IntervalStat;

/// Windowed in/out packet sums for one host that breached the multiplier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatioRow {
    pub key: String,
    pub incoming: u64,
    pub outgoing: u64,

    /// `outgoing / incoming`; `None` is the defined sentinel for
    /// `incoming == 0` (undefined/infinite), not an error.
    pub ratio: Option<f64>,
}

/// Sum incoming and outgoing packets per host across the given buckets and
/// report hosts where `outgoing >= multiplier × incoming`.
///
/// Hosts with zero activity in both directions are excluded. A host with
/// `incoming == 0, outgoing > 0` is always included, carrying the sentinel
/// ratio. Output is ordered by ratio descending with sentinel rows first,
/// host key ascending on ties.
pub fn outgoing_ratios(stats: &[IntervalStat], multiplier: f64) -> Vec<RatioRow> {
    let mut sums: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for stat in stats {
        let entry = sums.entry(stat.host_key.as_str()).or_default();
        entry.0 += stat.incoming_packets;
        entry.1 += stat.outgoing_packets;
    }

    let mut out: Vec<RatioRow> = sums
        .into_iter()
        .filter(|&(_, (incoming, outgoing))| incoming > 0 || outgoing > 0)
        .filter(|&(_, (incoming, outgoing))| outgoing as f64 >= multiplier * incoming as f64)
        .map(|(host, (incoming, outgoing))| RatioRow {
            key: host.to_string(),
            incoming,
            outgoing,
            ratio: (incoming > 0).then(|| outgoing as f64 / incoming as f64),
        })
        .collect();

    out.sort_by(|a, b| match (a.ratio, b.ratio) {
        (None, None) => a.key.cmp(&b.key),
        (None, Some(_)) => std::cmp::Ordering::Less,
        (Some(_), None) => std::cmp::Ordering::Greater,
        (Some(x), Some(y)) => y.total_cmp(&x).then_with(|| a.key.cmp(&b.key)),
    });
    out
}
