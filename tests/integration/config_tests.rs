//! Configuration integration tests

#[cfg(test)]
mod tests {
    use crate::common::{RecordingDelivery, ResultSetAssertions};
    use batch_dispatch::config::{Config, RateLimitConfig, RateLimitStrategy};
    use batch_dispatch::core::batch::BatchDispatcher;
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::NamedTempFile;
    use tokio_test::{assert_err, assert_ok};

    fn example_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/dispatch.yaml.example")
    }

    #[tokio::test]
    async fn test_example_config_loads() {
        let config = assert_ok!(Config::from_file(example_path()).await);

        assert_eq!(config.batch.batch_size, 25);
        assert_eq!(config.batch.max_retries, 3);
        assert!(config.batch.jitter);
        assert_eq!(
            config.rate_limit,
            Some(RateLimitConfig::new(5, 5).with_strategy(RateLimitStrategy::FixedWindow))
        );
        assert!(config.provider.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[tokio::test]
    async fn test_malformed_file_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"batch: [not, a, map]\n").unwrap();

        let err = assert_err!(Config::from_file(file.path()).await);
        assert!(err.is_config_error());
    }

    #[tokio::test]
    async fn test_invalid_rate_limit_file_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"rate_limit:\n  units_per_second: 0\n  burst_limit: 5\n")
            .unwrap();

        let err = assert_err!(Config::from_file(file.path()).await);
        assert!(err.to_string().contains("units_per_second"));
    }

    #[test]
    fn test_env_lookup_to_options() {
        let vars: HashMap<&str, &str> = [
            ("DISPATCH_BATCH_SIZE", "8"),
            ("DISPATCH_TIMEOUT_MS", "1500"),
            ("DISPATCH_RATE_LIMIT", "4"),
            ("DISPATCH_PROVIDER", "outlook"),
        ]
        .into_iter()
        .collect();

        let config =
            assert_ok!(Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())));
        let options = config.batch_options();

        // The provider preset reshapes chunks, the explicit limit still wins
        assert_eq!(options.batch_size, 3);
        assert_eq!(options.max_concurrent, 3);
        assert_eq!(options.delay_between_batches, Duration::from_secs(2));
        assert_eq!(options.timeout, Duration::from_millis(1500));
        assert_eq!(options.rate_limit, Some(RateLimitConfig::new(4, 4)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_from_yaml() {
        let config = assert_ok!(Config::from_yaml(
            "batch:\n  batch_size: 3\n  delay_between_batches_ms: 200\n  max_concurrent: 3\n"
        ));
        let delivery = RecordingDelivery::succeeding();

        let results = BatchDispatcher::new(config.batch_options())
            .run((0..9).collect(), delivery.clone())
            .await
            .unwrap();

        results.assert_one_per_job(9);
        assert_eq!(
            delivery.starts().last().copied(),
            Some(Duration::from_millis(400))
        );
    }
}
