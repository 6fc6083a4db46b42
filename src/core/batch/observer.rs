//! Progress observers

use super::options::BatchOptions;

/// Receives progress from the coordinating task of a run
///
/// Calls are never concurrent: the dispatcher invokes observers from a
/// single task.
pub trait BatchObserver: Send + Sync {
    /// A job finished; `current` is its index plus one, so values arrive
    /// out of order when jobs complete out of order
    fn on_progress(&self, _current: usize, _total: usize) {}

    /// A chunk finished
    fn on_batch_complete(
        &self,
        _batch_number: usize,
        _total_batches: usize,
        _success_count: usize,
        _error_count: usize,
    ) {
    }
}

/// Ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// Forwards events to the closures set on [`BatchOptions`]
pub(super) struct CallbackObserver<'a> {
    options: &'a BatchOptions,
}

impl<'a> CallbackObserver<'a> {
    pub(super) fn new(options: &'a BatchOptions) -> Self {
        Self { options }
    }
}

impl BatchObserver for CallbackObserver<'_> {
    fn on_progress(&self, current: usize, total: usize) {
        if let Some(callback) = &self.options.on_progress {
            callback(current, total);
        }
    }

    fn on_batch_complete(
        &self,
        batch_number: usize,
        total_batches: usize,
        success_count: usize,
        error_count: usize,
    ) {
        if let Some(callback) = &self.options.on_batch_complete {
            callback(batch_number, total_batches, success_count, error_count);
        }
    }
}
