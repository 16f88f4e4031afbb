//! Dataset files: a YAML snapshot of the two record sets.
//!
//! The same shape the capture/detection pipeline would feed into a real
//! deployment, flattened to a file so reports are reproducible.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trafikvakt_core::records::{AlertEvent, IntervalStat};
use trafikvakt_storage::{AlertStore, IntervalStore, MemoryStore};

use crate::error::CliError;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub alerts: Vec<AlertEvent>,
    pub intervals: Vec<IntervalStat>,
}

impl Dataset {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// Latest record timestamp, the natural window anchor for a report
    /// over recorded data.
    pub fn latest_timestamp(&self) -> Option<DateTime<Utc>> {
        let latest_alert = self.alerts.iter().map(|a| a.timestamp).max();
        let latest_interval = self.intervals.iter().map(|s| s.interval_end).max();
        latest_alert.max(latest_interval)
    }

    /// Materialize the dataset into an in-memory store pair.
    pub fn into_store(self) -> Result<Arc<MemoryStore>, CliError> {
        let store = Arc::new(MemoryStore::new());
        for alert in self.alerts {
            store.append_alert(alert)?;
        }
        for interval in self.intervals {
            store.append_interval(interval)?;
        }
        Ok(store)
    }
}
