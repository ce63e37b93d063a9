use chrono::{TimeZone, Utc};
use recap_error::CompletionErrorKind;
use recap_models::{classify_status, parse_retry_after};
use std::time::Duration;

#[test]
fn test_status_classification() {
    assert!(matches!(
        classify_status(401, None, ""),
        CompletionErrorKind::InvalidCredential(_)
    ));
    assert!(matches!(
        classify_status(403, None, ""),
        CompletionErrorKind::Forbidden(_)
    ));
    assert!(matches!(
        classify_status(408, None, ""),
        CompletionErrorKind::Timeout(_)
    ));
    assert!(matches!(
        classify_status(504, None, ""),
        CompletionErrorKind::Timeout(_)
    ));
    assert!(matches!(
        classify_status(429, None, ""),
        CompletionErrorKind::RateLimited { retry_after: None, .. }
    ));
    assert!(matches!(
        classify_status(500, None, ""),
        CompletionErrorKind::ServerError { status_code: 500, .. }
    ));
    assert!(matches!(
        classify_status(503, None, ""),
        CompletionErrorKind::ServerError { status_code: 503, .. }
    ));
    assert!(matches!(
        classify_status(400, None, ""),
        CompletionErrorKind::Unclassified(_)
    ));
    assert!(matches!(
        classify_status(404, None, ""),
        CompletionErrorKind::Unclassified(_)
    ));
}

#[test]
fn test_retry_after_only_attached_to_rate_limits() {
    let wait = Some(Duration::from_secs(9));
    assert_eq!(classify_status(429, wait, "").retry_after(), wait);
    assert_eq!(classify_status(503, wait, "").retry_after(), None);
}

#[test]
fn test_error_message_prefers_json_error_field() {
    let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
    match classify_status(401, None, body) {
        CompletionErrorKind::InvalidCredential(message) => {
            assert_eq!(message, "HTTP 401: Incorrect API key provided");
        }
        other => panic!("unexpected kind: {:?}", other),
    }
}

#[test]
fn test_error_message_is_truncated() {
    let body = "x".repeat(10_000);
    match classify_status(502, None, &body) {
        CompletionErrorKind::ServerError { message, .. } => assert!(message.len() < 600),
        other => panic!("unexpected kind: {:?}", other),
    }
}

#[test]
fn test_parse_retry_after_forms() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    assert_eq!(parse_retry_after("0", now), Some(Duration::ZERO));
    assert_eq!(parse_retry_after(" 45 ", now), Some(Duration::from_secs(45)));
    assert_eq!(parse_retry_after("1.5", now), Some(Duration::from_millis(1500)));
    assert_eq!(
        parse_retry_after("Fri, 01 Mar 2024 12:01:00 GMT", now),
        Some(Duration::from_secs(60))
    );
    assert_eq!(
        parse_retry_after("Fri, 01 Mar 2024 11:00:00 GMT", now),
        Some(Duration::ZERO)
    );
    assert_eq!(parse_retry_after("", now), None);
    assert_eq!(parse_retry_after("-3", now), None);
    assert_eq!(parse_retry_after("later", now), None);
    assert_eq!(parse_retry_after("NaN", now), None);
    assert_eq!(parse_retry_after("99999999999999999999", now), None);
}
