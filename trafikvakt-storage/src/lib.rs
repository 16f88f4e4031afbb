//! # trafikvakt-storage
//!
//! Store interfaces for the two append-only record sets the engine consumes,
//! plus an in-memory implementation used by tests and the CLI. Retention and
//! durability belong to the storage collaborator, not this crate.

pub mod error;
pub mod memory;
pub mod store;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use store::{AlertStore, IntervalStore};
