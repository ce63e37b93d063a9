//! Transport error classification.
//!
//! The only place where HTTP statuses, headers and client errors are turned
//! into a [`CompletionErrorKind`]. Everything downstream matches on the kind.

use chrono::{DateTime, Utc};
use recap_error::CompletionErrorKind;
use std::time::Duration;

const MAX_MESSAGE_CHARS: usize = 500;

/// Classify a non-success HTTP response.
///
/// | Status | Kind |
/// |---|---|
/// | 401 | `InvalidCredential` |
/// | 403 | `Forbidden` |
/// | 408, 504 | `Timeout` |
/// | 429 | `RateLimited` (with `retry_after`) |
/// | other 5xx | `ServerError` |
/// | anything else | `Unclassified` |
///
/// # Examples
///
/// ```
/// use recap_models::classify_status;
/// use recap_error::CompletionErrorKind;
/// use std::time::Duration;
///
/// let kind = classify_status(429, Some(Duration::from_secs(3)), "slow down");
/// assert_eq!(kind.retry_after(), Some(Duration::from_secs(3)));
/// assert!(matches!(classify_status(418, None, ""), CompletionErrorKind::Unclassified(_)));
/// ```
pub fn classify_status(
    status: u16,
    retry_after: Option<Duration>,
    body: &str,
) -> CompletionErrorKind {
    let message = error_message(status, body);
    match status {
        401 => CompletionErrorKind::InvalidCredential(message),
        403 => CompletionErrorKind::Forbidden(message),
        408 | 504 => CompletionErrorKind::Timeout(message),
        429 => CompletionErrorKind::RateLimited {
            retry_after,
            message,
        },
        500..=599 => CompletionErrorKind::ServerError {
            status_code: status,
            message,
        },
        _ => CompletionErrorKind::Unclassified(message),
    }
}

/// Classify a failure that happened before a response status was seen, or
/// while reading the body.
pub fn classify_transport(err: &reqwest::Error) -> CompletionErrorKind {
    if err.is_timeout() {
        CompletionErrorKind::Timeout(err.to_string())
    } else if err.is_connect() || err.is_request() {
        CompletionErrorKind::Network(err.to_string())
    } else {
        CompletionErrorKind::Unclassified(err.to_string())
    }
}

/// Parse a `Retry-After` header value.
///
/// Accepts delay-seconds (`"120"`, also fractional) or an HTTP-date, which
/// is measured against `now`. Dates in the past yield a zero wait.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use recap_models::parse_retry_after;
/// use std::time::Duration;
///
/// let now = Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap();
/// assert_eq!(parse_retry_after("30", now), Some(Duration::from_secs(30)));
/// assert_eq!(
///     parse_retry_after("Wed, 21 Oct 2015 07:28:10 GMT", now),
///     Some(Duration::from_secs(10))
/// );
/// assert_eq!(parse_retry_after("soon", now), None);
/// ```
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    if let Ok(secs) = value.parse::<f64>() {
        return Duration::try_from_secs_f64(secs).ok();
    }

    let at = DateTime::parse_from_rfc2822(value).ok()?;
    let wait = at.with_timezone(&Utc) - now;
    Some(wait.to_std().unwrap_or(Duration::ZERO))
}

/// Short, log-safe description of an error response.
fn error_message(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string());

    let detail: String = detail.chars().take(MAX_MESSAGE_CHARS).collect();
    if detail.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, detail)
    }
}
