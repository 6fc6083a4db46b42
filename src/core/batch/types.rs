//! Batch job and result types

use serde::{Deserialize, Serialize};

/// One unit of work, tagged with its position in the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job<T> {
    pub index: usize,
    pub payload: T,
}

impl<T> Job<T> {
    pub fn new(index: usize, payload: T) -> Self {
        Self { index, payload }
    }
}

/// Outcome of one job
///
/// Exactly one of `result` and `error` is set. `retry_count` is the number
/// of attempts used beyond the first on success, or `max_retries + 1` once
/// every attempt has failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult<R> {
    pub index: usize,
    pub success: bool,
    pub result: Option<R>,
    pub error: Option<String>,
    pub retry_count: u32,
    /// Wall time of the successful attempt; 0 for failures
    pub duration_ms: u64,
}

impl<R> BatchResult<R> {
    pub fn succeeded(index: usize, result: R, retry_count: u32, duration_ms: u64) -> Self {
        Self {
            index,
            success: true,
            result: Some(result),
            error: None,
            retry_count,
            duration_ms,
        }
    }

    pub fn failed<S: Into<String>>(index: usize, error: S, retry_count: u32) -> Self {
        Self {
            index,
            success: false,
            result: None,
            error: Some(error.into()),
            retry_count,
            duration_ms: 0,
        }
    }

    /// Whether the job succeeded only after at least one retry
    pub fn succeeded_after_retry(&self) -> bool {
        self.success && self.retry_count > 0
    }
}
