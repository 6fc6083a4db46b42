//! Rate limiting across whole runs

#[cfg(test)]
mod tests {
    use crate::common::{RecordingDelivery, ResultSetAssertions, starts_per_window};
    use batch_dispatch::config::{Config, ProviderProfile, RateLimitConfig, RateLimitStrategy};
    use batch_dispatch::core::batch::{BatchDispatcher, BatchOptions};
    use std::time::Duration;
    use tokio::time::Instant;

    fn options(rate_limit: RateLimitConfig) -> BatchOptions {
        BatchOptions::new()
            .with_batch_size(50)
            .with_max_concurrent(50)
            .with_delay_between_batches(Duration::ZERO)
            .with_rate_limit(rate_limit)
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_per_second_bounded_by_rate() {
        let delivery = RecordingDelivery::succeeding();
        let start = Instant::now();

        let results = BatchDispatcher::new(options(RateLimitConfig::new(5, 10)))
            .run((0..20).collect(), delivery.clone())
            .await
            .unwrap();

        results.assert_one_per_job(20);
        let windows = starts_per_window(&delivery.starts(), Duration::from_secs(1));
        assert!(windows.values().all(|&count| count <= 5), "{:?}", windows);
        assert_eq!(windows.len(), 4);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_limit_binds_below_rate() {
        let delivery = RecordingDelivery::succeeding();

        BatchDispatcher::new(options(RateLimitConfig::new(10, 2)))
            .run((0..6).collect(), delivery.clone())
            .await
            .unwrap();

        let windows = starts_per_window(&delivery.starts(), Duration::from_secs(1));
        assert_eq!(windows.values().copied().collect::<Vec<_>>(), vec![2, 2, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_deliveries_do_not_hold_the_window() {
        // Rate limiting gates starts, not completions
        let delivery = RecordingDelivery::succeeding().with_latency(Duration::from_millis(900));

        BatchDispatcher::new(options(RateLimitConfig::new(3, 3)))
            .run((0..9).collect(), delivery.clone())
            .await
            .unwrap();

        let starts = delivery.starts();
        assert_eq!(starts.len(), 9);
        assert_eq!(starts[8], Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sliding_window_bounds_every_trailing_window() {
        let delivery = RecordingDelivery::succeeding().with_latency(Duration::from_millis(30));
        let rate_limit =
            RateLimitConfig::new(4, 4).with_strategy(RateLimitStrategy::SlidingWindow);

        BatchDispatcher::new(options(rate_limit).with_max_concurrent(2))
            .run((0..16).collect(), delivery.clone())
            .await
            .unwrap();

        let starts = delivery.starts();
        for (i, &from) in starts.iter().enumerate() {
            let in_window = starts[i..]
                .iter()
                .filter(|&&at| at < from + Duration::from_secs(1))
                .count();
            assert!(in_window <= 4, "{} starts within 1s of {:?}", in_window, from);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_preset_limits_per_minute() {
        let config = Config {
            provider: Some(ProviderProfile::Gmail),
            ..Config::default()
        };
        let options = config.batch_options();
        assert_eq!(options.batch_size, 2);
        assert_eq!(options.max_concurrent, 2);

        let delivery = RecordingDelivery::succeeding();
        let results = BatchDispatcher::new(options)
            .run((0..12).collect(), delivery.clone())
            .await
            .unwrap();

        results.assert_one_per_job(12);
        let windows = starts_per_window(&delivery.starts(), Duration::from_secs(60));
        assert!(windows.values().all(|&count| count <= 5), "{:?}", windows);
        assert_eq!(windows.len(), 3);
    }
}
