//! Rate limiting for delivery starts
//!
//! A fixed window with burst control by default, and a strict sliding window
//! as an opt-in strategy. Callers are delayed, never rejected.

mod limiter;
mod strategies;
mod types;


pub use limiter::RateLimiter;
pub use types::{RateLimitResult, RateLimiterState};
