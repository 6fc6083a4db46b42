//! Batch summary

use super::category::ErrorCategory;
use crate::core::batch::BatchResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

/// Retry usage across a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryStats {
    /// Retries spent by successful jobs
    pub total_retries: u64,
    /// Most retries any successful job needed
    pub max_retries_used: u32,
    /// Jobs that succeeded only after retrying
    pub success_after_retry: usize,
}

/// Aggregate view of a run's results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub success_count: usize,
    pub error_count: usize,
    /// Percentage of successes, rounded to an integer
    pub success_rate: u32,
    pub is_full_success: bool,
    pub has_errors: bool,
    /// Mean of the non-zero durations, rounded
    pub avg_duration_ms: u64,
    /// Successes per second of summed delivery time, two decimals
    pub throughput_per_second: f64,
    /// Failures per category; `None` when there are none
    pub error_types: Option<BTreeMap<String, usize>>,
    pub retry_stats: RetryStats,
}

/// Fold results into a [`BatchSummary`]
pub fn summarize<R>(results: &[BatchResult<R>]) -> BatchSummary {
    let total = results.len();
    let success_count = results.iter().filter(|r| r.success).count();
    let error_count = total - success_count;
    let success_rate = if total > 0 {
        (success_count as f64 / total as f64 * 100.0).round() as u32
    } else {
        0
    };

    let durations: Vec<u64> = results
        .iter()
        .map(|r| r.duration_ms)
        .filter(|&d| d > 0)
        .collect();
    let total_duration: u64 = durations.iter().sum();
    let avg_duration_ms = if durations.is_empty() {
        0
    } else {
        (total_duration as f64 / durations.len() as f64).round() as u64
    };
    let throughput_per_second = if total_duration > 0 {
        round2(success_count as f64 / total_duration as f64 * 1000.0)
    } else {
        0.0
    };

    let mut error_types: BTreeMap<String, usize> = BTreeMap::new();
    for error in results
        .iter()
        .filter(|r| !r.success)
        .filter_map(|r| r.error.as_deref())
    {
        let category = ErrorCategory::classify(error);
        *error_types.entry(category.as_str().to_string()).or_default() += 1;
    }

    let mut retry_stats = RetryStats::default();
    for result in results.iter().filter(|r| r.success) {
        retry_stats.total_retries += u64::from(result.retry_count);
        retry_stats.max_retries_used = retry_stats.max_retries_used.max(result.retry_count);
        if result.retry_count > 0 {
            retry_stats.success_after_retry += 1;
        }
    }

    BatchSummary {
        total,
        success_count,
        error_count,
        success_rate,
        is_full_success: success_count == total,
        has_errors: error_count > 0,
        avg_duration_ms,
        throughput_per_second,
        error_types: (!error_types.is_empty()).then_some(error_types),
        retry_stats,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl BatchSummary {
    /// Write the summary through `tracing`
    pub fn log(&self, operation: &str) {
        info!(
            "{} summary: {}/{} succeeded ({}%), {} failed",
            operation, self.success_count, self.total, self.success_rate, self.error_count
        );
        if self.avg_duration_ms > 0 {
            info!("  Average duration: {}ms", self.avg_duration_ms);
        }
        if self.throughput_per_second > 0.0 {
            info!("  Throughput: {} items/s", self.throughput_per_second);
        }
        if self.retry_stats.total_retries > 0 {
            info!(
                "  Retries: {} total, {} successes after retry",
                self.retry_stats.total_retries, self.retry_stats.success_after_retry
            );
        }
        if let Some(error_types) = &self.error_types {
            for (category, count) in error_types {
                info!("  {}: {}", category, count);
            }
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} succeeded ({}%), {} failed",
            self.success_count, self.total, self.success_rate, self.error_count
        )?;
        if self.avg_duration_ms > 0 {
            write!(f, ", avg {}ms", self.avg_duration_ms)?;
        }
        if self.throughput_per_second > 0.0 {
            write!(f, ", {} items/s", self.throughput_per_second)?;
        }
        if let Some(error_types) = &self.error_types {
            let categories: Vec<String> = error_types
                .iter()
                .map(|(category, count)| format!("{}: {}", category, count))
                .collect();
            write!(f, " [{}]", categories.join(", "))?;
        }
        Ok(())
    }
}
