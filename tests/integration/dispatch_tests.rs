//! Dispatch property tests

#[cfg(test)]
mod tests {
    use crate::common::{Behavior, RecordingDelivery, ResultSetAssertions};
    use batch_dispatch::core::batch::{BatchDispatcher, BatchOptions};
    use batch_dispatch::core::metrics::summarize;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};
    use tokio_util::sync::CancellationToken;

    fn options() -> BatchOptions {
        BatchOptions::new()
            .with_batch_size(10)
            .with_max_concurrent(10)
            .with_delay_between_batches(Duration::from_millis(100))
            .with_backoff_bounds(Duration::from_millis(50), Duration::from_millis(500))
            .with_jitter(false)
    }

    fn jobs(count: u32) -> Vec<u32> {
        (0..count).collect()
    }

    // ==================== Result Set ====================

    #[tokio::test(start_paused = true)]
    async fn test_one_result_per_job() {
        for count in [0, 1, 7, 10, 33] {
            let dispatcher = BatchDispatcher::new(options());
            let results = assert_ok!(
                dispatcher
                    .run(jobs(count), RecordingDelivery::succeeding())
                    .await
            );
            results.assert_one_per_job(count as usize);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_carry_payload() {
        let results = BatchDispatcher::new(options())
            .run(jobs(12), RecordingDelivery::succeeding())
            .await
            .unwrap();

        for result in &results {
            assert_eq!(result.result, Some(result.index as u32));
            assert_eq!(result.retry_count, 0);
        }
    }

    #[tokio::test]
    async fn test_invalid_options() {
        for options in [
            options().with_max_concurrent(0),
            options().with_timeout(Duration::ZERO),
            options().with_backoff_multiplier(0.5),
            options().with_backoff_multiplier(f64::NAN),
        ] {
            let result = BatchDispatcher::new(options)
                .run(jobs(3), RecordingDelivery::succeeding())
                .await;
            let err = assert_err!(result);
            assert!(err.is_config_error(), "unexpected error: {}", err);
        }
    }

    // ==================== Concurrency ====================

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_never_exceeds_max_concurrent() {
        let delivery = RecordingDelivery::succeeding().with_latency(Duration::from_millis(20));
        let dispatcher = BatchDispatcher::new(
            options().with_batch_size(30).with_max_concurrent(3),
        );

        let results = dispatcher.run(jobs(30), delivery.clone()).await.unwrap();

        results.assert_one_per_job(30);
        assert_eq!(delivery.peak_in_flight(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_chunk_bounds_concurrency() {
        let delivery = RecordingDelivery::succeeding().with_latency(Duration::from_millis(20));
        let dispatcher = BatchDispatcher::new(
            options().with_batch_size(4).with_max_concurrent(50),
        );

        dispatcher.run(jobs(20), delivery.clone()).await.unwrap();

        assert_eq!(delivery.peak_in_flight(), 4);
    }

    // ==================== Retries ====================

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_uses_every_attempt() {
        let delivery = RecordingDelivery::new(Behavior::Fail("550 mailbox unavailable"));
        let dispatcher = BatchDispatcher::new(options().with_max_retries(2));

        let results = dispatcher.run(jobs(4), delivery.clone()).await.unwrap();

        results.assert_one_per_job(4);
        results.assert_all_failed_with("550 mailbox unavailable");
        assert!(results.iter().all(|r| r.retry_count == 3));
        assert_eq!(delivery.calls(), 12);
        for index in 0..4 {
            assert_eq!(delivery.attempts(index), 3);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_recover() {
        let delivery = RecordingDelivery::new(Behavior::FailFirst(2));
        let dispatcher = BatchDispatcher::new(options().with_max_retries(3));

        let results = dispatcher.run(jobs(5), delivery.clone()).await.unwrap();
        let summary = summarize(&results);

        assert!(summary.is_full_success);
        assert!(results.iter().all(|r| r.retry_count == 2));
        assert_eq!(summary.retry_stats.total_retries, 10);
        assert_eq!(summary.retry_stats.max_retries_used, 2);
        assert_eq!(summary.retry_stats.success_after_retry, 5);
        assert_eq!(delivery.calls(), 15);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries() {
        let delivery = RecordingDelivery::new(Behavior::Fail("boom"));
        let dispatcher = BatchDispatcher::new(options().with_max_retries(0));

        let results = dispatcher.run(jobs(3), delivery.clone()).await.unwrap();

        assert!(results.iter().all(|r| r.retry_count == 1));
        assert_eq!(delivery.calls(), 3);
    }

    // ==================== Cancellation ====================

    #[tokio::test(start_paused = true)]
    async fn test_cancel_mid_run_stops_new_starts() {
        let delivery = RecordingDelivery::succeeding().with_latency(Duration::from_millis(10));
        let dispatcher = BatchDispatcher::new(
            options()
                .with_batch_size(5)
                .with_delay_between_batches(Duration::from_secs(1)),
        );
        let cancel = CancellationToken::new();

        {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(1500)).await;
                cancel.cancel();
            });
        }

        let report = dispatcher
            .run_with_report(jobs(20), delivery.clone(), cancel)
            .await
            .unwrap();

        assert!(report.cancelled);
        assert!(report.ensure_completed().is_err());
        report.results.assert_one_per_job(20);

        // Two chunks ran before the cancel landed in the second pause
        let summary = report.summary();
        assert_eq!(summary.success_count, 10);
        assert_eq!(summary.error_count, 10);
        assert_eq!(delivery.calls(), 10);
        assert_eq!(
            summary.error_types.unwrap().get("Cancelled"),
            Some(&10)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_uncancelled_report() {
        let report = BatchDispatcher::new(options())
            .run_with_report(jobs(3), RecordingDelivery::succeeding(), CancellationToken::new())
            .await
            .unwrap();

        assert!(!report.cancelled);
        assert!(report.ensure_completed().is_ok());
    }
}
