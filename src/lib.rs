//! # batch-dispatch
//!
//! Rate-limited batch dispatch for outbound email jobs.
//!
//! Given a list of jobs and an async "deliver one job" operation, the engine
//! produces one result per job and an aggregate summary, while keeping the
//! downstream provider under its send quota.
//!
//! ## Features
//!
//! - **Chunked execution**: jobs run chunk by chunk with a pause in between
//! - **Concurrency limit**: at most `max_concurrent` deliveries in flight
//! - **Rate limit**: fixed window with burst control, or a strict sliding window
//! - **Retries**: per-attempt timeout, exponential backoff with jitter
//! - **Summary**: success rate, throughput, retry usage, categorized errors
//! - **Cancellation**: stop new starts, let in-flight deliveries finish
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use batch_dispatch::{BatchDispatcher, BatchOptions, DeliveryError, RateLimitConfig, summarize};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let recipients = vec!["ana@example.com".to_string(), "bob@example.org".to_string()];
//!
//!     let dispatcher = BatchDispatcher::new(
//!         BatchOptions::new()
//!             .with_max_concurrent(5)
//!             .with_rate_limit(RateLimitConfig::new(10, 10)),
//!     );
//!
//!     let results = dispatcher
//!         .run(recipients, |to: &String, _index: usize| {
//!             let to = to.clone();
//!             async move { Ok::<_, DeliveryError>(format!("queued for {}", to)) }
//!         })
//!         .await?;
//!
//!     println!("{}", summarize(&results));
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::{Config, RateLimitConfig, RateLimitStrategy};
pub use core::batch::{BatchDispatcher, BatchObserver, BatchOptions, BatchReport, BatchResult, Job};
pub use core::delivery::{Delivery, DeliveryError, OutboundMessage, SimulatedDelivery};
pub use core::limiter::{ConcurrencyLimiter, ReleaseToken};
pub use core::metrics::{BatchSummary, ErrorCategory, RetryStats, summarize};
pub use core::rate_limiter::RateLimiter;
pub use core::retry::{RetryController, RetryPolicy};
pub use utils::error::{DispatchError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Short git commit hash, `unknown` outside a checkout
    pub git_hash: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
        }
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
