//! Configuration-driven wiring of backends, driver, and summarizer.

use recap::{
    Backends, CompletionDriver, ErrorCode, RecapConfig, ScriptedDriver, StorageBackend,
    SummaryRequest, build_summarizer, driver_from_config,
};
use std::io::Write;
use std::sync::Arc;

const SUMMARY: &str = "Roadmap review: Q3 goals confirmed, hiring plan deferred to next sync.";

#[tokio::test]
async fn memory_backend_is_the_default() {
    let config = RecapConfig::default();

    let backends = Backends::connect(&config.database).await.unwrap();

    assert_eq!(backends.backend(), StorageBackend::Memory);
}

#[tokio::test]
async fn registered_owner_can_summarize_and_read_back() {
    let config = RecapConfig::default();
    let backends = Backends::in_memory();
    backends
        .register("roadmap-1", "priya", Some("Roadmap review"))
        .await
        .unwrap();

    let summarizer = build_summarizer(
        &config,
        Arc::new(ScriptedDriver::always(SUMMARY)),
        &backends,
    );
    let request = SummaryRequest::new("roadmap-1", "Priya: Q3 goals stand.", false);

    let response = summarizer.handle(&request, Some("priya")).await;
    assert!(response.is_success());

    let stored = summarizer
        .stored_summary("roadmap-1", Some("priya"))
        .await
        .unwrap();
    assert_eq!(stored.text, SUMMARY);

    let denied = summarizer.handle(&request, Some("sam")).await;
    assert_eq!(denied.error_code(), Some(ErrorCode::AccessDenied));
}

#[test]
fn http_driver_builds_from_defaults() {
    let config = RecapConfig::default();

    let driver = driver_from_config(&config.completion).unwrap();

    assert_eq!(driver.model_name(), "gpt-4o-mini");
}

#[tokio::test]
async fn config_file_selects_retry_budget_and_quality_bar() {
    let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
    writeln!(
        file,
        "[retry]\nmax_retries = 1\n\n[quality]\nmin_chars = 500\nmax_attempts = 1"
    )
    .unwrap();

    let config = RecapConfig::from_file(file.path()).unwrap();
    assert_eq!(config.retry.max_retries, 1);

    let backends = Backends::in_memory();
    backends.register("standup-3", "lee", None).await.unwrap();
    let driver = ScriptedDriver::always(SUMMARY);
    let summarizer = build_summarizer(&config, Arc::new(driver.clone()), &backends);

    let request = SummaryRequest::new("standup-3", "Lee: nothing blocked.", true);
    let response = summarizer.handle(&request, Some("lee")).await;

    assert_eq!(response.error_code(), Some(ErrorCode::ValidationFailed));
    assert_eq!(driver.call_count(), 1);
}
