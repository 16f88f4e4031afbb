//! In-memory append-only store.
//!
//! Records are kept sorted on insert so reads hand out ready-ordered
//! slices. Writers never block readers for long: appends take the write
//! lock only for the binary-search insert.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use trafikvakt_core::query::QueryCtx;
use trafikvakt_core::records::{AlertEvent, IntervalStat};

use crate::error::StorageError;
use crate::store::{AlertStore, IntervalStore};

/// Shared in-memory backing for both record sets.
#[derive(Default)]
pub struct MemoryStore {
    alerts: RwLock<Vec<AlertEvent>>,
    intervals: RwLock<Vec<IntervalStat>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.read().len()
    }

    pub fn interval_count(&self) -> usize {
        self.intervals.read().len()
    }
}

impl AlertStore for MemoryStore {
    fn append_alert(&self, event: AlertEvent) -> Result<(), StorageError> {
        let mut alerts = self.alerts.write();
        let pos = alerts
            .binary_search_by(|probe| probe.time_order(&event))
            .unwrap_or_else(|insert_at| insert_at);
        alerts.insert(pos, event);
        Ok(())
    }

    fn alerts_between(
        &self,
        ctx: &QueryCtx,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<AlertEvent>, StorageError> {
        ctx.ensure_active()?;
        let alerts = self.alerts.read();
        Ok(alerts
            .iter()
            .filter(|a| from.map_or(true, |f| a.timestamp >= f))
            .filter(|a| to.map_or(true, |t| a.timestamp <= t))
            .cloned()
            .collect())
    }

    fn recent_alerts(&self, ctx: &QueryCtx, limit: usize) -> Result<Vec<AlertEvent>, StorageError> {
        ctx.ensure_active()?;
        let alerts = self.alerts.read();
        Ok(alerts.iter().rev().take(limit).cloned().collect())
    }
}

impl IntervalStore for MemoryStore {
    fn append_interval(&self, stat: IntervalStat) -> Result<(), StorageError> {
        if !stat.is_well_formed() {
            return Err(StorageError::InvalidRecord(format!(
                "interval bucket for {} does not span a positive duration",
                stat.host_key
            )));
        }
        let mut intervals = self.intervals.write();
        let pos = intervals
            .binary_search_by(|probe| probe.time_order(&stat))
            .unwrap_or_else(|insert_at| insert_at);
        intervals.insert(pos, stat);
        Ok(())
    }

    fn intervals_between(
        &self,
        ctx: &QueryCtx,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<IntervalStat>, StorageError> {
        ctx.ensure_active()?;
        let intervals = self.intervals.read();
        Ok(intervals
            .iter()
            .filter(|s| from.map_or(true, |f| s.interval_end >= f))
            .filter(|s| to.map_or(true, |t| s.interval_end <= t))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn alert(id: u64, secs: i64, alert_type: &str) -> AlertEvent {
        AlertEvent {
            id,
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            alert_type: alert_type.into(),
            src_key: "10.0.0.1".into(),
            dst_key: "10.0.0.2".into(),
            details: String::new(),
        }
    }

    fn interval(id: u64, start: i64, host: &str) -> IntervalStat {
        IntervalStat {
            id,
            interval_start: Utc.timestamp_opt(start, 0).unwrap(),
            interval_end: Utc.timestamp_opt(start + 60, 0).unwrap(),
            host_key: host.into(),
            total_packets: 100,
            incoming_packets: 60,
            outgoing_packets: 40,
            unique_src_count: 5,
            unique_dst_port_count: 3,
            total_bytes: 4000,
        }
    }

    #[test]
    fn out_of_order_appends_read_back_sorted() {
        let store = MemoryStore::new();
        store.append_alert(alert(2, 200, "DDoS")).unwrap();
        store.append_alert(alert(1, 100, "DDoS")).unwrap();
        store.append_alert(alert(3, 150, "Port Scan")).unwrap();

        let ctx = QueryCtx::unbounded();
        let all = store.alerts_between(&ctx, None, None).unwrap();
        let ids: Vec<u64> = all.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let store = MemoryStore::new();
        for (id, secs) in [(1, 100), (2, 200), (3, 300)] {
            store.append_alert(alert(id, secs, "DDoS")).unwrap();
        }
        let ctx = QueryCtx::unbounded();
        let slice = store
            .alerts_between(
                &ctx,
                Some(Utc.timestamp_opt(100, 0).unwrap()),
                Some(Utc.timestamp_opt(200, 0).unwrap()),
            )
            .unwrap();
        assert_eq!(slice.len(), 2);
    }

    #[test]
    fn recent_alerts_returns_newest_first() {
        let store = MemoryStore::new();
        for (id, secs) in [(1, 100), (2, 200), (3, 300)] {
            store.append_alert(alert(id, secs, "DDoS")).unwrap();
        }
        let ctx = QueryCtx::unbounded();
        let recent = store.recent_alerts(&ctx, 2).unwrap();
        let ids: Vec<u64> = recent.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn malformed_interval_is_rejected() {
        let store = MemoryStore::new();
        let mut bad = interval(1, 100, "10.0.0.9");
        bad.interval_end = bad.interval_start;
        assert!(matches!(
            store.append_interval(bad),
            Err(StorageError::InvalidRecord(_))
        ));
    }

    #[test]
    fn cancelled_ctx_interrupts_reads() {
        let store = MemoryStore::new();
        store.append_alert(alert(1, 100, "DDoS")).unwrap();
        let ctx = QueryCtx::unbounded();
        ctx.cancel();
        assert!(matches!(
            store.alerts_between(&ctx, None, None),
            Err(StorageError::Interrupted(_))
        ));
    }
}
