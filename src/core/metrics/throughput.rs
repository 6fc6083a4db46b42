//! Peak throughput tracking

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Trailing window used for the peak rate
pub const PEAK_WINDOW: Duration = Duration::from_secs(5);

/// Highest completion rate observed over any trailing window
///
/// Until a full window has elapsed the rate is measured over the elapsed
/// time, floored at one second so the first completions do not spike.
#[derive(Debug, Clone)]
pub struct ThroughputTracker {
    started: Instant,
    window: Duration,
    completions: VecDeque<Instant>,
    peak: f64,
}

impl ThroughputTracker {
    pub fn new() -> Self {
        Self::with_window(PEAK_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            started: Instant::now(),
            window,
            completions: VecDeque::new(),
            peak: 0.0,
        }
    }

    /// Count one completion now
    pub fn record(&mut self) {
        self.record_at(Instant::now());
    }

    fn record_at(&mut self, now: Instant) {
        self.completions.push_back(now);
        while let Some(&oldest) = self.completions.front() {
            if now.duration_since(oldest) > self.window {
                self.completions.pop_front();
            } else {
                break;
            }
        }

        let span = now
            .duration_since(self.started)
            .min(self.window)
            .max(Duration::from_secs(1));
        let rate = self.completions.len() as f64 / span.as_secs_f64();
        if rate > self.peak {
            self.peak = rate;
        }
    }

    /// Peak completions per second, two decimals
    pub fn peak(&self) -> f64 {
        (self.peak * 100.0).round() / 100.0
    }
}

impl Default for ThroughputTracker {
    fn default() -> Self {
        Self::new()
    }
}
