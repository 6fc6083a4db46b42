//! Error handling for the dispatch engine
//!
//! Engine-level failures only. Per-job delivery failures never surface here,
//! they are folded into `BatchResult` values instead.

mod helpers;
mod types;

pub use types::{DispatchError, Result};
