//! # trafikvakt-analytics
//!
//! Pure aggregation kernels over time-ordered record slices. Every function
//! here is deterministic for identical input: no clocks, no I/O, no shared
//! state. The facade crate composes these into the named dashboard views.
//!
//! ### Components:
//! - `windows`: trailing-window counts and sums (two-pointer scan)
//! - `bursts`: inter-arrival gap clustering
//! - `spikes`: consecutive-interval step-change detection
//! - `ratios`: windowed directional traffic ratios
//! - `ranking`: deterministic top-K selection

pub mod bursts;
pub mod ranking;
pub mod ratios;
pub mod spikes;
pub mod windows;

pub use bursts::{cluster_bursts, Burst};
pub use ranking::top_k;
pub use ratios::{outgoing_ratios, RatioRow};
pub use spikes::{detect_spikes, Spike};
pub use windows::{rolling_event_counts, rolling_interval_sums, RollingCount, RollingSum};
