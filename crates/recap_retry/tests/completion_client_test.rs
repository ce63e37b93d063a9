//! Retry loop behavior under paused tokio time.

use recap_core::CompletionRequest;
use recap_error::CompletionErrorKind;
use recap_models::{ScriptedDriver, ScriptedResponse};
use recap_retry::{BackoffPolicy, CompletionClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn request() -> CompletionRequest {
    CompletionRequest::builder()
        .prompt("Summarize the standup")
        .model("scripted-model")
        .build()
        .unwrap()
}

fn client(driver: &ScriptedDriver) -> CompletionClient {
    CompletionClient::new(Arc::new(driver.clone()), BackoffPolicy::default())
}

fn ms(d: Duration) -> u128 {
    d.as_millis()
}

#[tokio::test(start_paused = true)]
async fn succeeds_first_try_without_waiting() {
    let driver = ScriptedDriver::always("Everything shipped.");
    let start = Instant::now();

    let completion = client(&driver).complete(&request()).await.unwrap();

    assert_eq!(completion.response.text, "Everything shipped.");
    assert_eq!(completion.attempts, 1);
    assert_eq!(completion.retries(), 0);
    assert_eq!(driver.call_count(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn server_error_then_success_counts_one_retry() {
    let driver = ScriptedDriver::new(vec![
        ScriptedResponse::server_error(503),
        ScriptedResponse::text("Recovered summary"),
    ]);
    let start = Instant::now();

    let completion = client(&driver).complete(&request()).await.unwrap();

    assert_eq!(completion.retries(), 1);
    assert_eq!(driver.call_count(), 2);
    let waited = ms(start.elapsed());
    assert!((1000..=1100).contains(&waited), "waited {}ms", waited);
}

#[tokio::test(start_paused = true)]
async fn retryable_failures_exhaust_exactly_max_retries() {
    let driver = ScriptedDriver::new(vec![ScriptedResponse::server_error(500)]);
    let start = Instant::now();

    let err = client(&driver).complete(&request()).await.unwrap_err();

    assert_eq!(driver.call_count(), 3);
    assert_eq!(err.attempts, 3);
    assert!(err.budget_exhausted());
    assert!(matches!(
        err.kind,
        CompletionErrorKind::ServerError { status_code: 500, .. }
    ));

    // Waits after attempts 1 and 2 only: 1000 + 2000, plus at most 10% jitter.
    let waited = ms(start.elapsed());
    assert!((3000..=3300).contains(&waited), "waited {}ms", waited);

    // The wait that would have preceded attempt 4.
    let suggested = err.suggested_wait.map(ms).unwrap();
    assert!((4000..=4400).contains(&suggested), "suggested {}ms", suggested);
}

#[tokio::test(start_paused = true)]
async fn non_retryable_failure_makes_one_attempt() {
    let driver = ScriptedDriver::new(vec![
        ScriptedResponse::Error(CompletionErrorKind::InvalidCredential("bad key".to_string())),
        ScriptedResponse::text("never reached"),
    ]);
    let start = Instant::now();

    let err = client(&driver).complete(&request()).await.unwrap_err();

    assert_eq!(driver.call_count(), 1);
    assert_eq!(err.attempts, 1);
    assert!(!err.budget_exhausted());
    assert!(matches!(err.kind, CompletionErrorKind::InvalidCredential(_)));
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn unclassified_failure_is_never_retried() {
    let driver = ScriptedDriver::failing(CompletionErrorKind::Unclassified("teapot".to_string()));

    let err = client(&driver).complete(&request()).await.unwrap_err();

    assert_eq!(driver.call_count(), 1);
    assert!(matches!(err.kind, CompletionErrorKind::Unclassified(_)));
}

#[tokio::test(start_paused = true)]
async fn server_retry_after_overrides_backoff() {
    let driver = ScriptedDriver::new(vec![
        ScriptedResponse::rate_limited(Some(Duration::from_secs(7))),
        ScriptedResponse::text("Done after waiting"),
    ]);
    let start = Instant::now();

    let completion = client(&driver).complete(&request()).await.unwrap();

    assert_eq!(completion.retries(), 1);
    assert_eq!(start.elapsed(), Duration::from_secs(7));
}

#[tokio::test(start_paused = true)]
async fn retry_after_applies_to_next_attempt_only() {
    let driver = ScriptedDriver::new(vec![
        ScriptedResponse::rate_limited(Some(Duration::from_secs(20))),
        ScriptedResponse::server_error(502),
        ScriptedResponse::text("Third time lucky"),
    ]);
    let start = Instant::now();

    let completion = client(&driver).complete(&request()).await.unwrap();

    assert_eq!(completion.attempts, 3);
    // 20s from the server, then the computed 2000ms (+ jitter) after attempt 2.
    let waited = ms(start.elapsed());
    assert!((22_000..=22_200).contains(&waited), "waited {}ms", waited);
}

#[tokio::test(start_paused = true)]
async fn retry_after_never_extends_the_budget() {
    let driver = ScriptedDriver::new(vec![ScriptedResponse::rate_limited(Some(
        Duration::from_secs(1),
    ))]);

    let err = client(&driver).complete(&request()).await.unwrap_err();

    assert_eq!(driver.call_count(), 3);
    assert_eq!(err.attempts, 3);
    assert!(matches!(err.kind, CompletionErrorKind::RateLimited { .. }));
    assert_eq!(err.suggested_wait, Some(Duration::from_secs(1)));
}

#[tokio::test(start_paused = true)]
async fn rate_limit_without_directive_uses_computed_backoff() {
    let driver = ScriptedDriver::new(vec![
        ScriptedResponse::rate_limited(None),
        ScriptedResponse::text("ok"),
    ]);
    let start = Instant::now();

    client(&driver).complete(&request()).await.unwrap();

    let waited = ms(start.elapsed());
    assert!((1000..=1100).contains(&waited), "waited {}ms", waited);
}

#[tokio::test(start_paused = true)]
async fn classification_of_last_error_is_preserved() {
    let driver = ScriptedDriver::new(vec![
        ScriptedResponse::server_error(503),
        ScriptedResponse::Error(CompletionErrorKind::Network("reset".to_string())),
        ScriptedResponse::Error(CompletionErrorKind::Timeout("read timeout".to_string())),
    ]);

    let err = client(&driver).complete(&request()).await.unwrap_err();

    assert_eq!(err.attempts, 3);
    assert!(matches!(err.kind, CompletionErrorKind::Timeout(_)));
}

#[tokio::test(start_paused = true)]
async fn each_invocation_gets_a_fresh_budget() {
    let driver = ScriptedDriver::new(vec![
        ScriptedResponse::server_error(500),
        ScriptedResponse::server_error(500),
        ScriptedResponse::text("first"),
        ScriptedResponse::server_error(500),
        ScriptedResponse::server_error(500),
        ScriptedResponse::text("second"),
    ]);
    let client = client(&driver);

    let first = client.complete(&request()).await.unwrap();
    let second = client.complete(&request()).await.unwrap();

    assert_eq!(first.attempts, 3);
    assert_eq!(second.attempts, 3);
    assert_eq!(second.response.text, "second");
}

#[tokio::test(start_paused = true)]
async fn custom_budget_is_respected() {
    let driver = ScriptedDriver::new(vec![ScriptedResponse::server_error(500)]);
    let policy = BackoffPolicy::new(
        5,
        Duration::from_millis(10),
        2.0,
        Duration::from_millis(1000),
        0.0,
    );
    let client = CompletionClient::new(Arc::new(driver.clone()), policy);
    let start = Instant::now();

    let err = client.complete(&request()).await.unwrap_err();

    assert_eq!(driver.call_count(), 5);
    assert_eq!(err.attempts, 5);
    assert_eq!(start.elapsed(), Duration::from_millis(10 + 20 + 40 + 80));
}
