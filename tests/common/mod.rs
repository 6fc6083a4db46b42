//! Common test utilities for batch-dispatch

pub mod fixtures;

pub use assertions::ResultSetAssertions;
pub use fixtures::{Behavior, RecordingDelivery, starts_per_window};
