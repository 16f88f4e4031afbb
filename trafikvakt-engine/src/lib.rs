//! # trafikvakt-engine
//!
//! Analytics facade: composes the store interfaces and the aggregation
//! kernels into the fixed set of named views the dashboard and alerting
//! poll. Frontends (CLI today, HTTP tomorrow) share this implementation
//! instead of reinventing per-view plumbing.

pub mod cache;
pub mod engine;
pub mod error;
pub mod views;

pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use views::{
    AvgPacketSizeRow, BandwidthRow, FanoutRow, HourlyAlertRow, KeyCountRow,
};
