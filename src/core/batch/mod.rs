//! Chunked batch dispatch
//!
//! Jobs are split into chunks that run one after another. Inside a chunk
//! every job is its own task, gated by the concurrency limiter and the rate
//! limiter, and driven to completion by the retry controller.

mod observer;
mod options;
mod report;
mod scheduler;
mod types;


pub use observer::{BatchObserver, NoopObserver};
pub use options::{
    BatchCompleteCallback, BatchOptions, LARGE_VOLUME_MAX_BATCH_SIZE, LARGE_VOLUME_MIN_DELAY,
    LARGE_VOLUME_THRESHOLD, ProgressCallback,
};
pub use report::BatchReport;
pub use scheduler::BatchDispatcher;
pub use types::{BatchResult, Job};
