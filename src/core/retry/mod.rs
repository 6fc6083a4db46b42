//! Per-job retry with timeout and exponential backoff

mod controller;
mod policy;

pub use controller::RetryController;
pub use policy::RetryPolicy;
