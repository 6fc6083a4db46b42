//! Reference scenarios

#[cfg(test)]
mod tests {
    use crate::common::{Behavior, RecordingDelivery, ResultSetAssertions};
    use batch_dispatch::core::batch::{BatchDispatcher, BatchOptions};
    use batch_dispatch::core::metrics::summarize;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    /// 10 jobs, 3 at a time, 10ms deliveries: all succeed
    #[tokio::test(start_paused = true)]
    async fn test_all_succeed_with_bounded_concurrency() {
        let delivery = RecordingDelivery::succeeding().with_latency(Duration::from_millis(10));
        let dispatcher = BatchDispatcher::new(BatchOptions::new().with_max_concurrent(3));

        let results = dispatcher.run((0..10).collect(), delivery.clone()).await.unwrap();
        let summary = summarize(&results);

        results.assert_one_per_job(10);
        assert_eq!(summary.success_count, 10);
        assert_eq!(summary.success_rate, 100);
        assert!(summary.is_full_success);
        assert!(summary.throughput_per_second > 0.0);
        assert_eq!(summary.avg_duration_ms, 10);
        assert!(delivery.peak_in_flight() <= 3);
    }

    /// 5 jobs refused by the relay, 2 retries: classified as connection errors
    #[tokio::test(start_paused = true)]
    async fn test_refused_connections_exhaust_retries() {
        let delivery = RecordingDelivery::new(Behavior::Fail("SMTP connection refused"));
        let dispatcher = BatchDispatcher::new(BatchOptions::new().with_max_retries(2));

        let results = dispatcher.run((0..5).collect(), delivery.clone()).await.unwrap();
        let summary = summarize(&results);

        results.assert_one_per_job(5);
        results.assert_all_failed_with("SMTP connection refused");
        assert!(results.iter().all(|r| r.retry_count == 3));
        assert_eq!(delivery.calls(), 15);

        let error_types = summary.error_types.unwrap();
        assert_eq!(error_types.len(), 1);
        assert_eq!(error_types.get("ConnectionError"), Some(&5));
        assert_eq!(summary.success_rate, 0);
    }

    /// 600 jobs with large-volume mode: chunks of 37, 750ms pauses
    #[tokio::test(start_paused = true)]
    async fn test_large_volume_adjusts_chunks_and_pauses() {
        let batches = Arc::new(Mutex::new(Vec::new()));
        let options = {
            let batches = Arc::clone(&batches);
            BatchOptions::new()
                .with_large_volume_optimizations(true)
                .on_batch_complete(move |batch, total, ok, failed| {
                    batches.lock().push((batch, total, ok + failed));
                })
        };
        assert_eq!(options.effective_batch_size(600), 37);
        assert_eq!(options.effective_delay(600), Duration::from_millis(750));

        let start = Instant::now();
        let results = BatchDispatcher::new(options)
            .run((0..600).collect(), RecordingDelivery::succeeding())
            .await
            .unwrap();

        results.assert_one_per_job(600);
        let batches = batches.lock();
        assert_eq!(batches.len(), 17);
        assert!(batches.iter().all(|&(_, total, _)| total == 17));
        assert!(batches[..16].iter().all(|&(_, _, size)| size == 37));
        assert_eq!(batches[16].2, 8);
        assert_eq!(start.elapsed(), Duration::from_millis(16 * 750));
    }

    /// A 40s delivery against a 30s timeout fails as a timeout
    #[tokio::test(start_paused = true)]
    async fn test_hanging_delivery_times_out() {
        let delivery = RecordingDelivery::new(Behavior::Hang(Duration::from_secs(40)));
        let dispatcher = BatchDispatcher::new(BatchOptions::new().with_max_retries(0));

        let results = dispatcher.run(vec![0], delivery).await.unwrap();
        let summary = summarize(&results);

        assert!(!results[0].success);
        assert_eq!(results[0].retry_count, 1);
        assert!(results[0].error.as_deref().unwrap_or_default().contains("Timeout"));
        assert_eq!(
            summary.error_types.unwrap().get("Timeout"),
            Some(&1)
        );
    }

    /// A timed-out first attempt consumes one retry, the second succeeds
    #[tokio::test(start_paused = true)]
    async fn test_timeout_consumes_one_retry() {
        let delivery = RecordingDelivery::new(Behavior::HangFirst(Duration::from_secs(40)));
        let dispatcher = BatchDispatcher::new(BatchOptions::new());

        let start = Instant::now();
        let results = dispatcher.run(vec![7], delivery.clone()).await.unwrap();

        assert!(results[0].success);
        assert_eq!(results[0].retry_count, 1);
        assert_eq!(delivery.attempts(0), 2);
        // 30s timeout plus roughly 1s of backoff
        assert!(start.elapsed() >= Duration::from_millis(30_950));
        assert!(start.elapsed() <= Duration::from_millis(31_050));
    }
}
