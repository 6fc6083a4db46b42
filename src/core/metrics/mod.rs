//! Result aggregation
//!
//! Everything here is pure over a slice of results, except the
//! [`ThroughputTracker`] the dispatcher feeds while a run is in progress.

mod category;
mod summary;
mod throughput;

pub use category::ErrorCategory;
pub use summary::{BatchSummary, RetryStats, summarize};
pub use throughput::ThroughputTracker;
