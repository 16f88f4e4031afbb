//! The analytics facade.
//!
//! Every view is a pure function of a store snapshot plus explicit
//! parameters: the window anchor is fixed once at call start, parameters
//! are validated before any read, and a failure in one call never affects
//! concurrent or subsequent calls.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tracing::{instrument, warn};

use trafikvakt_analytics::{
    cluster_bursts, detect_spikes, outgoing_ratios, rolling_event_counts, rolling_interval_sums,
    top_k, Burst, RatioRow, RollingCount, RollingSum, Spike,
};
use trafikvakt_config::{TrafikvaktConfig, ViewDefaults};
use trafikvakt_core::query::QueryCtx;
use trafikvakt_core::records::AlertEvent;
use trafikvakt_storage::{AlertStore, IntervalStore};
use trafikvakt_telemetry::{EventLogger, MetricsRecorder};

use crate::cache::ViewCache;
use crate::error::AnalyticsError;
use crate::views::{AvgPacketSizeRow, BandwidthRow, FanoutRow, HourlyAlertRow, KeyCountRow};

/// Alert type emitted by the port-scan detector.
pub const SCAN_ALERT_TYPE: &str = "Port Scan";

pub struct AnalyticsEngine {
    alerts: Arc<dyn AlertStore>,
    intervals: Arc<dyn IntervalStore>,
    defaults: ViewDefaults,
    metrics: MetricsRecorder,
    rolling_total_cache: ViewCache,

    /// Frozen window anchor for reports over recorded data; live queries
    /// anchor at the wall clock.
    reference: Option<DateTime<Utc>>,
}

impl AnalyticsEngine {
    pub fn new(
        alerts: Arc<dyn AlertStore>,
        intervals: Arc<dyn IntervalStore>,
        config: &TrafikvaktConfig,
        metrics: MetricsRecorder,
    ) -> Self {
        Self {
            alerts,
            intervals,
            defaults: config.views.clone(),
            metrics,
            rolling_total_cache: ViewCache::new(StdDuration::from_secs(
                config.engine.cache_ttl_secs,
            )),
            reference: None,
        }
    }

    /// Anchor all windows at a fixed instant instead of the wall clock.
    pub fn with_reference(mut self, reference: DateTime<Utc>) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn defaults(&self) -> &ViewDefaults {
        &self.defaults
    }

    fn anchor(&self) -> DateTime<Utc> {
        self.reference.unwrap_or_else(Utc::now)
    }

    /// Hourly alert histogram per alert type over the lookback.
    #[instrument(level = "debug", skip(self, ctx))]
    pub fn alerts_by_hour(
        &self,
        ctx: &QueryCtx,
        lookback_hours: u64,
    ) -> Result<Vec<HourlyAlertRow>, AnalyticsError> {
        let lookback = positive_window(lookback_hours.saturating_mul(3600), "lookback_hours")?;
        self.observe("alerts_by_hour", || {
            let now = self.anchor();
            let alerts = self.alerts.alerts_between(ctx, Some(now - lookback), Some(now))?;

            let mut cells: BTreeMap<(String, String), u64> = BTreeMap::new();
            for alert in &alerts {
                let bucket = alert.timestamp.format("%Y-%m-%d %H:00").to_string();
                *cells.entry((bucket, alert.alert_type.clone())).or_default() += 1;
            }
            Ok(cells
                .into_iter()
                .map(|((hour_bucket, alert_type), count)| HourlyAlertRow {
                    hour_bucket,
                    alert_type,
                    count,
                })
                .collect())
        })
    }

    /// All-time alert-count leaderboard by source key.
    #[instrument(level = "debug", skip(self, ctx))]
    pub fn top_sources(
        &self,
        ctx: &QueryCtx,
        limit: usize,
    ) -> Result<Vec<KeyCountRow>, AnalyticsError> {
        positive_limit(limit, "limit")?;
        self.observe("top_sources", || {
            let alerts = self.alerts.alerts_between(ctx, None, Some(self.anchor()))?;
            let mut counts: BTreeMap<String, u64> = BTreeMap::new();
            for alert in &alerts {
                *counts.entry(alert.src_key.clone()).or_default() += 1;
            }
            Ok(top_k(counts, limit)
                .into_iter()
                .map(|(key, count)| KeyCountRow { key, count })
                .collect())
        })
    }

    /// Per-event trailing count of one alert type, a near-real-time
    /// severity signal.
    #[instrument(level = "debug", skip(self, ctx))]
    pub fn rolling_alert_count(
        &self,
        ctx: &QueryCtx,
        alert_type: &str,
        window_secs: u64,
    ) -> Result<Vec<RollingCount>, AnalyticsError> {
        let window = positive_window(window_secs, "window_secs")?;
        if alert_type.is_empty() {
            return Err(AnalyticsError::InvalidParameter(
                "alert_type must not be empty".into(),
            ));
        }
        self.observe("rolling_alert_count", || {
            let alerts = self.alerts.alerts_between(ctx, None, Some(self.anchor()))?;
            let timestamps: Vec<DateTime<Utc>> = alerts
                .iter()
                .filter(|a| a.alert_type == alert_type)
                .map(|a| a.timestamp)
                .collect();
            Ok(rolling_event_counts(&timestamps, window))
        })
    }

    /// Port-scan bursts per source, ordered by burst start.
    #[instrument(level = "debug", skip(self, ctx))]
    pub fn scan_bursts(
        &self,
        ctx: &QueryCtx,
        gap_secs: u64,
        min_size: u64,
    ) -> Result<Vec<Burst>, AnalyticsError> {
        let gap = positive_window(gap_secs, "gap_secs")?;
        if min_size < 2 {
            return Err(AnalyticsError::InvalidParameter(
                "min_size must be at least 2; a single event is never a burst".into(),
            ));
        }
        self.observe("scan_bursts", || {
            let alerts = self.alerts.alerts_between(ctx, None, Some(self.anchor()))?;

            let mut per_source: BTreeMap<&str, Vec<DateTime<Utc>>> = BTreeMap::new();
            for alert in alerts.iter().filter(|a| a.alert_type == SCAN_ALERT_TYPE) {
                per_source
                    .entry(alert.src_key.as_str())
                    .or_default()
                    .push(alert.timestamp);
            }

            let mut bursts = Vec::new();
            for (source, timestamps) in per_source {
                ctx.ensure_active()?;
                bursts.extend(cluster_bursts(source, &timestamps, gap, min_size));
            }
            bursts.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.key.cmp(&b.key)));
            Ok(bursts)
        })
    }

    /// Byte-sum leaderboard over the trailing window.
    #[instrument(level = "debug", skip(self, ctx))]
    pub fn top_bandwidth(
        &self,
        ctx: &QueryCtx,
        window_secs: u64,
        limit: usize,
    ) -> Result<Vec<BandwidthRow>, AnalyticsError> {
        let window = positive_window(window_secs, "window_secs")?;
        positive_limit(limit, "limit")?;
        self.observe("top_bandwidth", || {
            let now = self.anchor();
            let stats = self
                .intervals
                .intervals_between(ctx, Some(now - window), Some(now))?;

            let mut sums: BTreeMap<String, (u64, u64)> = BTreeMap::new();
            for stat in &stats {
                let entry = sums.entry(stat.host_key.clone()).or_default();
                entry.0 += stat.total_bytes;
                entry.1 += stat.total_packets;
            }
            let packets: BTreeMap<String, u64> =
                sums.iter().map(|(k, v)| (k.clone(), v.1)).collect();
            Ok(top_k(sums.into_iter().map(|(k, v)| (k, v.0)), limit)
                .into_iter()
                .map(|(key, bytes)| BandwidthRow {
                    packets: packets.get(&key).copied().unwrap_or(0),
                    key,
                    bytes,
                })
                .collect())
        })
    }

    /// All-time average packet size per host, largest first. Hosts that
    /// carried no packets are excluded rather than divided by zero.
    #[instrument(level = "debug", skip(self, ctx))]
    pub fn avg_packet_size_per_host(
        &self,
        ctx: &QueryCtx,
    ) -> Result<Vec<AvgPacketSizeRow>, AnalyticsError> {
        self.observe("avg_packet_size_per_host", || {
            let stats = self.intervals.intervals_between(ctx, None, Some(self.anchor()))?;

            let mut sums: BTreeMap<String, (u64, u64)> = BTreeMap::new();
            for stat in &stats {
                let entry = sums.entry(stat.host_key.clone()).or_default();
                entry.0 += stat.total_bytes;
                entry.1 += stat.total_packets;
            }
            let mut rows: Vec<AvgPacketSizeRow> = sums
                .into_iter()
                .filter(|&(_, (_, packets))| packets > 0)
                .map(|(key, (bytes, packets))| AvgPacketSizeRow {
                    key,
                    avg_packet_bytes: bytes as f64 / packets as f64,
                    total_packets: packets,
                })
                .collect();
            rows.sort_by(|a, b| {
                b.avg_packet_bytes
                    .total_cmp(&a.avg_packet_bytes)
                    .then_with(|| a.key.cmp(&b.key))
            });
            Ok(rows)
        })
    }

    /// Hosts whose windowed outgoing volume breaches the multiplier.
    #[instrument(level = "debug", skip(self, ctx))]
    pub fn heavy_outgoing_hosts(
        &self,
        ctx: &QueryCtx,
        window_secs: u64,
        ratio_multiplier: f64,
    ) -> Result<Vec<RatioRow>, AnalyticsError> {
        let window = positive_window(window_secs, "window_secs")?;
        if !ratio_multiplier.is_finite() || ratio_multiplier <= 0.0 {
            return Err(AnalyticsError::InvalidParameter(format!(
                "ratio_multiplier must be finite and positive, got {ratio_multiplier}"
            )));
        }
        self.observe("heavy_outgoing_hosts", || {
            let now = self.anchor();
            let stats = self
                .intervals
                .intervals_between(ctx, Some(now - window), Some(now))?;
            Ok(outgoing_ratios(&stats, ratio_multiplier))
        })
    }

    /// Peak distinct-destination-port counts over the window, a scan
    /// indicator. At most `fanout_limit` rows (configured default).
    #[instrument(level = "debug", skip(self, ctx))]
    pub fn port_fanout(
        &self,
        ctx: &QueryCtx,
        min_ports: u64,
        window_secs: u64,
    ) -> Result<Vec<FanoutRow>, AnalyticsError> {
        let window = positive_window(window_secs, "window_secs")?;
        if min_ports == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "min_ports must be positive".into(),
            ));
        }
        let limit = self.defaults.fanout_limit;
        self.observe("port_fanout", || {
            let now = self.anchor();
            let stats = self
                .intervals
                .intervals_between(ctx, Some(now - window), Some(now))?;

            let mut peaks: BTreeMap<String, u64> = BTreeMap::new();
            for stat in &stats {
                let peak = peaks.entry(stat.host_key.clone()).or_default();
                *peak = (*peak).max(stat.unique_dst_port_count);
            }
            Ok(top_k(
                peaks.into_iter().filter(|&(_, ports)| ports >= min_ports),
                limit,
            )
            .into_iter()
            .map(|(key, unique_dst_ports)| FanoutRow {
                key,
                unique_dst_ports,
            })
            .collect())
        })
    }

    /// Unique-source step changes between consecutive buckets, largest
    /// jumps first. A host's first bucket is never flagged.
    #[instrument(level = "debug", skip(self, ctx))]
    pub fn new_source_spikes(
        &self,
        ctx: &QueryCtx,
        window_secs: u64,
        threshold: u64,
    ) -> Result<Vec<Spike>, AnalyticsError> {
        let window = positive_window(window_secs, "window_secs")?;
        if threshold == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "threshold must be positive".into(),
            ));
        }
        self.observe("new_source_spikes", || {
            let now = self.anchor();
            let stats = self
                .intervals
                .intervals_between(ctx, Some(now - window), Some(now))?;
            Ok(detect_spikes(&stats, |s| s.unique_src_count, threshold))
        })
    }

    /// Trailing packet totals summed across hosts, one row per interval
    /// boundary. The heaviest view, memoized under a bounded TTL.
    #[instrument(level = "debug", skip(self, ctx))]
    pub fn rolling_packet_total(
        &self,
        ctx: &QueryCtx,
        window_secs: u64,
    ) -> Result<Vec<RollingSum>, AnalyticsError> {
        let window = positive_window(window_secs, "window_secs")?;
        self.observe("rolling_packet_total", || {
            if let Some(rows) = self.rolling_total_cache.get(window_secs) {
                return Ok(rows);
            }
            let stats = self.intervals.intervals_between(ctx, None, Some(self.anchor()))?;

            let mut per_host: BTreeMap<&str, Vec<(DateTime<Utc>, u64)>> = BTreeMap::new();
            for stat in &stats {
                per_host
                    .entry(stat.host_key.as_str())
                    .or_default()
                    .push((stat.interval_end, stat.total_packets));
            }

            let mut totals: BTreeMap<DateTime<Utc>, u64> = BTreeMap::new();
            for (_, points) in per_host {
                ctx.ensure_active()?;
                for rolled in rolling_interval_sums(&points, window) {
                    *totals.entry(rolled.boundary).or_default() += rolled.sum;
                }
            }
            let rows: Vec<RollingSum> = totals
                .into_iter()
                .map(|(boundary, sum)| RollingSum { boundary, sum })
                .collect();
            self.rolling_total_cache.put(window_secs, &rows);
            Ok(rows)
        })
    }

    /// Newest alerts first, the dashboard's activity feed.
    #[instrument(level = "debug", skip(self, ctx))]
    pub fn recent_alerts(
        &self,
        ctx: &QueryCtx,
        limit: usize,
    ) -> Result<Vec<AlertEvent>, AnalyticsError> {
        positive_limit(limit, "limit")?;
        self.observe("recent_alerts", || {
            Ok(self.alerts.recent_alerts(ctx, limit)?)
        })
    }

    /// Wrap one view computation with metrics and completion logging.
    fn observe<T>(
        &self,
        view: &'static str,
        compute: impl FnOnce() -> Result<Vec<T>, AnalyticsError>,
    ) -> Result<Vec<T>, AnalyticsError> {
        self.metrics.view_queries.inc();
        let timer = self.metrics.view_latency.start_timer();
        let result = compute();
        timer.observe_duration();
        match &result {
            Ok(rows) => EventLogger::log_view(view, rows.len()),
            Err(err) => {
                self.metrics.view_errors.inc();
                warn!(view, error = %err, "view query failed");
            }
        }
        result
    }
}

fn positive_window(secs: u64, name: &str) -> Result<Duration, AnalyticsError> {
    if secs == 0 {
        return Err(AnalyticsError::InvalidParameter(format!(
            "{name} must be positive"
        )));
    }
    // An unchecked cast would wrap huge values negative, turning the window
    // filter into an empty range instead of an error.
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| {
            AnalyticsError::InvalidParameter(format!("{name} of {secs} s is out of range"))
        })
}

fn positive_limit(limit: usize, name: &str) -> Result<(), AnalyticsError> {
    if limit == 0 {
        return Err(AnalyticsError::InvalidParameter(format!(
            "{name} must be positive"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use trafikvakt_core::query::QueryError;
    use trafikvakt_storage::{MemoryStore, StorageError};

    const ANCHOR_SECS: i64 = 100_000;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn alert(id: u64, secs: i64, alert_type: &str, src: &str) -> AlertEvent {
        AlertEvent {
            id,
            timestamp: ts(secs),
            alert_type: alert_type.into(),
            src_key: src.into(),
            dst_key: "192.168.1.10".into(),
            details: String::new(),
        }
    }

    fn stat(
        host: &str,
        start: i64,
        packets: (u64, u64),
        unique_src: u64,
        ports: u64,
        bytes: u64,
    ) -> trafikvakt_core::records::IntervalStat {
        trafikvakt_core::records::IntervalStat {
            id: start as u64,
            interval_start: ts(start),
            interval_end: ts(start + 60),
            host_key: host.into(),
            total_packets: packets.0 + packets.1,
            incoming_packets: packets.0,
            outgoing_packets: packets.1,
            unique_src_count: unique_src,
            unique_dst_port_count: ports,
            total_bytes: bytes,
        }
    }

    fn engine_over(store: Arc<MemoryStore>) -> AnalyticsEngine {
        let config = TrafikvaktConfig::default();
        AnalyticsEngine::new(store.clone(), store, &config, MetricsRecorder::new())
            .with_reference(ts(ANCHOR_SECS))
    }

    /// Store double whose reads always fail.
    struct BrokenStore;

    impl AlertStore for BrokenStore {
        fn append_alert(&self, _: AlertEvent) -> Result<(), StorageError> {
            Ok(())
        }
        fn alerts_between(
            &self,
            _: &QueryCtx,
            _: Option<DateTime<Utc>>,
            _: Option<DateTime<Utc>>,
        ) -> Result<Vec<AlertEvent>, StorageError> {
            Err(StorageError::Unavailable("backend offline".into()))
        }
        fn recent_alerts(&self, _: &QueryCtx, _: usize) -> Result<Vec<AlertEvent>, StorageError> {
            Err(StorageError::Unavailable("backend offline".into()))
        }
    }

    impl IntervalStore for BrokenStore {
        fn append_interval(
            &self,
            _: trafikvakt_core::records::IntervalStat,
        ) -> Result<(), StorageError> {
            Ok(())
        }
        fn intervals_between(
            &self,
            _: &QueryCtx,
            _: Option<DateTime<Utc>>,
            _: Option<DateTime<Utc>>,
        ) -> Result<Vec<trafikvakt_core::records::IntervalStat>, StorageError> {
            Err(StorageError::Unavailable("backend offline".into()))
        }
    }

    fn broken_engine() -> AnalyticsEngine {
        let store = Arc::new(BrokenStore);
        let config = TrafikvaktConfig::default();
        AnalyticsEngine::new(store.clone(), store, &config, MetricsRecorder::new())
            .with_reference(ts(ANCHOR_SECS))
    }

    #[test]
    fn empty_stores_yield_empty_rows_not_errors() {
        let engine = engine_over(Arc::new(MemoryStore::new()));
        let ctx = QueryCtx::unbounded();
        assert!(engine.alerts_by_hour(&ctx, 24).unwrap().is_empty());
        assert!(engine.scan_bursts(&ctx, 30, 3).unwrap().is_empty());
        assert!(engine.rolling_packet_total(&ctx, 1800).unwrap().is_empty());
    }

    #[test]
    fn store_outage_is_surfaced_never_masked_as_empty() {
        let engine = broken_engine();
        let ctx = QueryCtx::unbounded();
        assert!(matches!(
            engine.top_sources(&ctx, 10),
            Err(AnalyticsError::InputUnavailable(_))
        ));
        assert!(matches!(
            engine.top_bandwidth(&ctx, 600, 5),
            Err(AnalyticsError::InputUnavailable(_))
        ));
    }

    #[test]
    fn bad_parameters_are_rejected_before_any_read() {
        // BrokenStore would error on read; InvalidParameter proves the
        // rejection happened first.
        let engine = broken_engine();
        let ctx = QueryCtx::unbounded();
        assert!(matches!(
            engine.rolling_alert_count(&ctx, "DDoS", 0),
            Err(AnalyticsError::InvalidParameter(_))
        ));
        assert!(matches!(
            engine.top_bandwidth(&ctx, 600, 0),
            Err(AnalyticsError::InvalidParameter(_))
        ));
        assert!(matches!(
            engine.scan_bursts(&ctx, 30, 1),
            Err(AnalyticsError::InvalidParameter(_))
        ));
        assert!(matches!(
            engine.heavy_outgoing_hosts(&ctx, 600, f64::NAN),
            Err(AnalyticsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn oversized_windows_are_rejected_not_fatal() {
        // BrokenStore again: InvalidParameter proves no read was attempted.
        let engine = broken_engine();
        let ctx = QueryCtx::unbounded();
        // Beyond what chrono::Duration can represent in milliseconds.
        assert!(matches!(
            engine.rolling_packet_total(&ctx, 10_000_000_000_000_000),
            Err(AnalyticsError::InvalidParameter(_))
        ));
        // Would wrap negative through an unchecked i64 cast.
        assert!(matches!(
            engine.top_bandwidth(&ctx, u64::MAX, 5),
            Err(AnalyticsError::InvalidParameter(_))
        ));
        // Saturates to u64::MAX seconds before the window check.
        assert!(matches!(
            engine.alerts_by_hour(&ctx, u64::MAX),
            Err(AnalyticsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn cancelled_query_reports_interrupted() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine_over(store);
        let ctx = QueryCtx::unbounded();
        ctx.cancel();
        assert!(matches!(
            engine.alerts_by_hour(&ctx, 24),
            Err(AnalyticsError::Interrupted(QueryError::Cancelled))
        ));
    }

    #[test]
    fn scan_burst_scenario_filters_undersized_runs() {
        let store = Arc::new(MemoryStore::new());
        let base = ANCHOR_SECS - 3600;
        for (id, offset) in [(1, 0), (2, 10), (3, 45), (4, 50)] {
            store
                .append_alert(alert(id, base + offset, SCAN_ALERT_TYPE, "10.0.0.1"))
                .unwrap();
        }
        let engine = engine_over(store);
        let ctx = QueryCtx::unbounded();

        // gap 30s splits into two runs of 2; min_size 3 filters both.
        assert!(engine.scan_bursts(&ctx, 30, 3).unwrap().is_empty());
        // min_size 2 reports both runs.
        let bursts = engine.scan_bursts(&ctx, 30, 2).unwrap();
        assert_eq!(bursts.len(), 2);
        assert_eq!(bursts[0].count, 2);
    }

    #[test]
    fn bursts_never_mix_sources() {
        let store = Arc::new(MemoryStore::new());
        let base = ANCHOR_SECS - 3600;
        // Interleaved in time, but three events per source.
        for (id, offset, src) in [
            (1, 0, "10.0.0.1"),
            (2, 2, "10.0.0.2"),
            (3, 4, "10.0.0.1"),
            (4, 6, "10.0.0.2"),
            (5, 8, "10.0.0.1"),
            (6, 10, "10.0.0.2"),
        ] {
            store
                .append_alert(alert(id, base + offset, SCAN_ALERT_TYPE, src))
                .unwrap();
        }
        let engine = engine_over(store);
        let bursts = engine.scan_bursts(&QueryCtx::unbounded(), 30, 3).unwrap();
        assert_eq!(bursts.len(), 2);
        assert!(bursts.iter().all(|b| b.count == 3));
    }

    #[test]
    fn rolling_alert_count_tracks_only_the_requested_type() {
        let store = Arc::new(MemoryStore::new());
        let base = ANCHOR_SECS - 3600;
        store.append_alert(alert(1, base, "DDoS", "10.0.0.1")).unwrap();
        store
            .append_alert(alert(2, base + 10, SCAN_ALERT_TYPE, "10.0.0.1"))
            .unwrap();
        store
            .append_alert(alert(3, base + 20, "DDoS", "10.0.0.1"))
            .unwrap();

        let engine = engine_over(store);
        let counts = engine
            .rolling_alert_count(&QueryCtx::unbounded(), "DDoS", 600)
            .unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[1].count, 2);
    }

    #[test]
    fn alerts_by_hour_buckets_and_labels() {
        let store = Arc::new(MemoryStore::new());
        // 1970-01-02 03:xx bucket, inside the 24h lookback from the anchor.
        store.append_alert(alert(1, 97_300, "DDoS", "a")).unwrap();
        store.append_alert(alert(2, 97_400, "DDoS", "b")).unwrap();
        store
            .append_alert(alert(3, 97_500, SCAN_ALERT_TYPE, "c"))
            .unwrap();
        let engine = engine_over(store);
        let rows = engine.alerts_by_hour(&QueryCtx::unbounded(), 24).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].count + rows[1].count, 3);
        assert!(rows[0].hour_bucket.ends_with(":00"));
    }

    #[test]
    fn top_bandwidth_limits_and_breaks_ties_by_key() {
        let store = Arc::new(MemoryStore::new());
        let start = ANCHOR_SECS - 300;
        store
            .append_interval(stat("host-b", start, (10, 10), 1, 1, 500))
            .unwrap();
        store
            .append_interval(stat("host-a", start, (10, 10), 1, 1, 500))
            .unwrap();
        store
            .append_interval(stat("host-c", start, (10, 10), 1, 1, 900))
            .unwrap();
        let engine = engine_over(store);
        let rows = engine.top_bandwidth(&QueryCtx::unbounded(), 600, 2).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "host-c");
        assert_eq!(rows[1].key, "host-a"); // tie with host-b broken by key
    }

    #[test]
    fn bandwidth_window_excludes_old_intervals() {
        let store = Arc::new(MemoryStore::new());
        store
            .append_interval(stat("host-a", ANCHOR_SECS - 10_000, (10, 10), 1, 1, 9_999))
            .unwrap();
        store
            .append_interval(stat("host-b", ANCHOR_SECS - 300, (10, 10), 1, 1, 100))
            .unwrap();
        let engine = engine_over(store);
        let rows = engine.top_bandwidth(&QueryCtx::unbounded(), 600, 5).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "host-b");
    }

    #[test]
    fn heavy_outgoing_sentinel_through_the_facade() {
        let store = Arc::new(MemoryStore::new());
        let start = ANCHOR_SECS - 300;
        store
            .append_interval(stat("no-inbound", start, (0, 9), 1, 1, 100))
            .unwrap();
        store
            .append_interval(stat("idle", start, (0, 0), 0, 0, 0))
            .unwrap();
        let engine = engine_over(store);
        let rows = engine
            .heavy_outgoing_hosts(&QueryCtx::unbounded(), 600, 2.0)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "no-inbound");
        assert_eq!(rows[0].ratio, None);
    }

    #[test]
    fn port_fanout_takes_peak_per_host() {
        let store = Arc::new(MemoryStore::new());
        store
            .append_interval(stat("scanner", ANCHOR_SECS - 400, (1, 1), 1, 80, 10))
            .unwrap();
        store
            .append_interval(stat("scanner", ANCHOR_SECS - 300, (1, 1), 1, 120, 10))
            .unwrap();
        store
            .append_interval(stat("quiet", ANCHOR_SECS - 300, (1, 1), 1, 3, 10))
            .unwrap();
        let engine = engine_over(store);
        let rows = engine.port_fanout(&QueryCtx::unbounded(), 20, 600).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "scanner");
        assert_eq!(rows[0].unique_dst_ports, 120);
    }

    #[test]
    fn new_source_spike_scenario() {
        let store = Arc::new(MemoryStore::new());
        let base = ANCHOR_SECS - 600;
        for (i, unique_src) in [3u64, 3, 9].iter().enumerate() {
            store
                .append_interval(stat("H", base + (i as i64) * 60, (1, 1), *unique_src, 1, 10))
                .unwrap();
        }
        let engine = engine_over(store);
        let spikes = engine
            .new_source_spikes(&QueryCtx::unbounded(), 3600, 5)
            .unwrap();
        assert_eq!(spikes.len(), 1);
        assert_eq!(spikes[0].delta, 6);
    }

    #[test]
    fn rolling_packet_total_sums_across_hosts() {
        let store = Arc::new(MemoryStore::new());
        let base = ANCHOR_SECS - 600;
        store
            .append_interval(stat("a", base, (5, 5), 1, 1, 10))
            .unwrap();
        store
            .append_interval(stat("b", base, (15, 15), 1, 1, 10))
            .unwrap();
        store
            .append_interval(stat("a", base + 60, (10, 10), 1, 1, 10))
            .unwrap();
        let engine = engine_over(store);
        let rows = engine
            .rolling_packet_total(&QueryCtx::unbounded(), 1800)
            .unwrap();
        assert_eq!(rows.len(), 2);
        // First boundary: 10 + 30 across hosts; second boundary only host a
        // has a bucket, carrying its trailing 10 + 20.
        assert_eq!(rows[0].sum, 40);
        assert_eq!(rows[1].sum, 30);
    }

    #[test]
    fn views_are_idempotent_for_fixed_state() {
        let store = Arc::new(MemoryStore::new());
        let base = ANCHOR_SECS - 600;
        for (id, offset) in [(1, 0), (2, 5), (3, 10)] {
            store
                .append_alert(alert(id, base + offset, SCAN_ALERT_TYPE, "10.0.0.1"))
                .unwrap();
        }
        store
            .append_interval(stat("a", base, (5, 25), 3, 40, 1000))
            .unwrap();
        let engine = engine_over(store);
        let ctx = QueryCtx::unbounded();

        assert_eq!(
            engine.scan_bursts(&ctx, 30, 3).unwrap(),
            engine.scan_bursts(&ctx, 30, 3).unwrap()
        );
        assert_eq!(
            engine.rolling_packet_total(&ctx, 1800).unwrap(),
            engine.rolling_packet_total(&ctx, 1800).unwrap()
        );
        assert_eq!(
            engine.heavy_outgoing_hosts(&ctx, 3600, 1.0).unwrap(),
            engine.heavy_outgoing_hosts(&ctx, 3600, 1.0).unwrap()
        );
    }

    #[test]
    fn recent_alerts_come_newest_first() {
        let store = Arc::new(MemoryStore::new());
        for (id, secs) in [(1, 100), (2, 300), (3, 200)] {
            store.append_alert(alert(id, secs, "DDoS", "a")).unwrap();
        }
        let engine = engine_over(store);
        let rows = engine.recent_alerts(&QueryCtx::unbounded(), 2).unwrap();
        let ids: Vec<u64> = rows.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
