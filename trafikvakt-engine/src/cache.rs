//! TTL-scoped memo for the heaviest materialization.
//!
//! New records arrive continuously and asynchronously from capture, so the
//! cache is only ever bounded by time, never invalidated manually. One slot
//! is enough: the dashboard polls the same default window repeatedly.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use trafikvakt_analytics::RollingSum;

struct Slot {
    stored_at: Instant,
    window_secs: u64,
    rows: Vec<RollingSum>,
}

pub struct ViewCache {
    ttl: Duration,
    slot: Mutex<Option<Slot>>,
}

impl ViewCache {
    /// `ttl` of zero disables caching entirely.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn get(&self, window_secs: u64) -> Option<Vec<RollingSum>> {
        if self.ttl.is_zero() {
            return None;
        }
        let slot = self.slot.lock();
        slot.as_ref()
            .filter(|s| s.window_secs == window_secs && s.stored_at.elapsed() < self.ttl)
            .map(|s| s.rows.clone())
    }

    pub fn put(&self, window_secs: u64, rows: &[RollingSum]) {
        if self.ttl.is_zero() {
            return;
        }
        *self.slot.lock() = Some(Slot {
            stored_at: Instant::now(),
            window_secs,
            rows: rows.to_vec(),
        });
    }
}
