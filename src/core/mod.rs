//! Core dispatch engine
//!
//! Leaf-first:
//!
//! - [`limiter`]: bounds how many deliveries are in flight
//! - [`rate_limiter`]: bounds how many deliveries may start per window
//! - [`retry`]: one job's attempts, each under a timeout, with backoff
//! - [`batch`]: chunked scheduling, progress callbacks, run reports
//! - [`metrics`]: pure aggregation of results into a summary
//! - [`delivery`]: the seam to the caller's transport

pub mod batch;
pub mod delivery;
pub mod limiter;
pub mod metrics;
pub mod rate_limiter;
pub mod retry;
