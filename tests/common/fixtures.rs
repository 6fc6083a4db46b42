//! Delivery fixtures

use async_trait::async_trait;
use batch_dispatch::core::delivery::{Delivery, DeliveryError};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// How the fixture responds to each attempt
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Every attempt succeeds with the payload
    Succeed,
    /// Every attempt fails with this message
    Fail(&'static str),
    /// The first `n` attempts of each job fail, later ones succeed
    FailFirst(u32),
    /// Every attempt sleeps this long before succeeding
    Hang(Duration),
    /// The first attempt of each job hangs, later ones succeed
    HangFirst(Duration),
}

#[derive(Debug)]
struct State {
    origin: Instant,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    starts: Mutex<Vec<Duration>>,
    attempts: Mutex<HashMap<usize, u32>>,
}

/// Delivery that records what the engine does to it
#[derive(Debug, Clone)]
pub struct RecordingDelivery {
    state: Arc<State>,
    latency: Duration,
    behavior: Behavior,
}

/// Decrements the in-flight count even when a timed-out attempt is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl RecordingDelivery {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            state: Arc::new(State {
                origin: Instant::now(),
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
                starts: Mutex::new(Vec::new()),
                attempts: Mutex::new(HashMap::new()),
            }),
            latency: Duration::ZERO,
            behavior,
        }
    }

    pub fn succeeding() -> Self {
        Self::new(Behavior::Succeed)
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Total attempts across all jobs
    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.state.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Attempt start times, relative to fixture creation, in start order
    pub fn starts(&self) -> Vec<Duration> {
        self.state.starts.lock().clone()
    }

    /// Attempts made for one job
    pub fn attempts(&self, index: usize) -> u32 {
        self.state.attempts.lock().get(&index).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Delivery<u32> for RecordingDelivery {
    type Output = u32;

    async fn deliver(&self, payload: &u32, index: usize) -> Result<u32, DeliveryError> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        self.state.starts.lock().push(self.state.origin.elapsed());
        let attempt = {
            let mut attempts = self.state.attempts.lock();
            let count = attempts.entry(index).or_insert(0);
            *count += 1;
            *count
        };

        let now = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.state.in_flight);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match &self.behavior {
            Behavior::Succeed => Ok(*payload),
            Behavior::Fail(message) => Err(DeliveryError::transport(*message)),
            Behavior::FailFirst(n) if attempt <= *n => {
                Err(DeliveryError::transport("SMTP connection refused"))
            }
            Behavior::FailFirst(_) => Ok(*payload),
            Behavior::Hang(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(*payload)
            }
            Behavior::HangFirst(duration) if attempt == 1 => {
                tokio::time::sleep(*duration).await;
                Ok(*payload)
            }
            Behavior::HangFirst(_) => Ok(*payload),
        }
    }
}

/// Count starts per fixed window, keyed by window number
pub fn starts_per_window(starts: &[Duration], window: Duration) -> BTreeMap<u128, usize> {
    let mut buckets = BTreeMap::new();
    for start in starts {
        *buckets
            .entry(start.as_nanos() / window.as_nanos())
            .or_insert(0) += 1;
    }
    buckets
}
