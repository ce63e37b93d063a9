use recap_core::{RecapConfig, StorageBackend};
use std::io::Write;
use std::time::Duration;

#[test]
fn bundled_defaults_match_documented_values() {
    let config = RecapConfig::from_toml_str("").expect("bundled defaults parse");

    assert_eq!(config.retry.max_retries, 3);
    assert_eq!(config.retry.base_delay_ms, 1000);
    assert_eq!(config.retry.multiplier, 2.0);
    assert_eq!(config.retry.max_delay_ms, 60_000);
    assert_eq!(config.retry.jitter_fraction, 0.1);
    assert_eq!(config.quality.min_chars, 50);
    assert_eq!(config.quality.max_attempts, 2);
    assert_eq!(config.pipeline.prompt_version, "meeting-summary-v1");
    assert_eq!(config.pipeline.timeout(), Some(Duration::from_secs(300)));
    assert_eq!(config.pipeline.audit_sample_chars, 200);
    assert_eq!(config.completion.request_timeout(), Duration::from_secs(60));
    assert_eq!(config.completion.requests_per_minute, None);
    assert_eq!(config.server.identity_header, "x-requester-id");
    assert_eq!(config.database.backend, StorageBackend::Memory);
}

#[test]
fn bundled_defaults_match_struct_defaults() {
    let loaded = RecapConfig::from_toml_str("").unwrap();
    assert_eq!(loaded, RecapConfig::default());
}

#[test]
fn overrides_replace_only_named_keys() {
    let config = RecapConfig::from_toml_str(
        r#"
        [retry]
        max_retries = 5

        [quality]
        min_chars = 120

        [completion]
        requests_per_minute = 30
        "#,
    )
    .unwrap();

    assert_eq!(config.retry.max_retries, 5);
    assert_eq!(config.retry.base_delay_ms, 1000);
    assert_eq!(config.quality.min_chars, 120);
    assert_eq!(config.quality.max_attempts, 2);
    assert_eq!(config.completion.requests_per_minute, Some(30));
}

#[test]
fn zero_timeout_disables_deadline() {
    let config = RecapConfig::from_toml_str("[pipeline]\ntimeout_secs = 0\n").unwrap();
    assert_eq!(config.pipeline.timeout(), None);
}

#[test]
fn from_file_layers_over_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[database]\nbackend = \"postgres\"\npool_size = 2").unwrap();

    let config = RecapConfig::from_file(file.path()).unwrap();
    assert_eq!(config.database.backend, StorageBackend::Postgres);
    assert_eq!(config.database.pool_size, 2);
    assert_eq!(config.database.url_env, "DATABASE_URL");
}

#[test]
fn validate_rejects_unusable_values() {
    let bad = [
        "[retry]\nmax_retries = 0\n",
        "[retry]\nmultiplier = 0.5\n",
        "[retry]\njitter_fraction = 1.5\n",
        "[retry]\nbase_delay_ms = 5000\nmax_delay_ms = 100\n",
        "[quality]\nmax_attempts = 0\n",
        "[completion]\nrequests_per_minute = 0\n",
        "[database]\npool_size = 0\n",
    ];

    for overrides in bad {
        let err = RecapConfig::from_toml_str(overrides).unwrap_err();
        assert_eq!(err.code(), recap_error::ErrorCode::Unexpected, "{}", overrides);
    }
}

#[test]
fn validate_allows_zero_min_chars() {
    let config = RecapConfig::from_toml_str("[quality]\nmin_chars = 0\n").unwrap();
    assert_eq!(config.quality.min_chars, 0);
}

#[test]
fn malformed_toml_is_a_config_error() {
    let err = RecapConfig::from_toml_str("[retry\nmax_retries = ").unwrap_err();
    assert!(format!("{}", err).contains("Configuration Error"));
}
