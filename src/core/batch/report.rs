//! Run report

use super::types::BatchResult;
use crate::core::metrics::{BatchSummary, summarize};
use crate::utils::error::{DispatchError, Result};
use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct BatchReport<R> {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Wall time of the whole run, pauses included
    pub elapsed: Duration,
    /// One result per job, in completion order
    pub results: Vec<BatchResult<R>>,
    /// Whether the run was stopped early
    pub cancelled: bool,
    /// Highest completions per second over any 5s window
    pub peak_throughput: f64,
}

impl<R> BatchReport<R> {
    pub fn summary(&self) -> BatchSummary {
        summarize(&self.results)
    }

    /// Put results back in input order
    pub fn sort_by_index(&mut self) {
        self.results.sort_by_key(|r| r.index);
    }

    /// Err with [`DispatchError::Cancelled`] if the run was stopped early
    pub fn ensure_completed(&self) -> Result<()> {
        if self.cancelled {
            Err(DispatchError::Cancelled)
        } else {
            Ok(())
        }
    }

    pub fn into_results(self) -> Vec<BatchResult<R>> {
        self.results
    }
}
