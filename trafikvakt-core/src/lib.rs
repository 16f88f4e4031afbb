//! # trafikvakt-core
//!
//! Foundation layer for the traffic analytics engine: the two input record
//! types, their ordering rules, and the query context shared by every view.
//!
//! ### Key Submodules:
//! - `records`: `AlertEvent` and `IntervalStat` input schemas
//! - `query`: cooperative cancellation/deadline context for view calls

pub mod query;
pub mod records;

pub mod prelude {
    pub use crate::query::*;
    pub use crate::records::*;
}

pub use query::{QueryCtx, QueryError};
pub use records::{AlertEvent, IntervalStat};
