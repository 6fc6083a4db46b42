//! Configuration data models
//!
//! This module defines all configuration structures used by the dispatch engine.

#![allow(missing_docs)]

pub mod batch;
pub mod logging;
pub mod provider;
pub mod rate_limit;

// Re-export all configuration types
pub use batch::*;
pub use logging::*;
pub use provider::*;
pub use rate_limit::*;

/// Default chunk size
pub fn default_batch_size() -> usize {
    25
}

/// Default pause between chunks in milliseconds
pub fn default_delay_between_batches_ms() -> u64 {
    1000
}

/// Default number of deliveries allowed in flight
pub fn default_max_concurrent() -> usize {
    25
}

/// Default maximum retry attempts
pub fn default_max_retries() -> u32 {
    3
}

/// Default per-attempt timeout in milliseconds
pub fn default_timeout_ms() -> u64 {
    30_000
}

pub fn default_backoff_multiplier() -> f64 {
    1.5
}

pub fn default_base_backoff_ms() -> u64 {
    1000
}

pub fn default_max_backoff_ms() -> u64 {
    10_000
}

pub fn default_units_per_second() -> u32 {
    2
}

pub fn default_burst_limit() -> u32 {
    10
}

/// Default rate limit window in milliseconds
pub fn default_window_ms() -> u64 {
    1000
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}
