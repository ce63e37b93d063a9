//! Caller-facing error codes.

use serde::{Deserialize, Serialize};

/// Structured error code returned to callers in place of raw error text.
///
/// Rendered in SCREAMING_SNAKE_CASE both by `Display` and by serde.
///
/// # Examples
///
/// ```
/// use recap_error::ErrorCode;
///
/// assert_eq!(ErrorCode::RateLimited.to_string(), "RATE_LIMITED");
/// assert_eq!(ErrorCode::RateLimited.http_status(), 429);
/// assert_eq!("NOT_FOUND".parse::<ErrorCode>().unwrap(), ErrorCode::NotFound);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A required request field is absent or blank
    MissingField,
    /// The resource does not exist
    NotFound,
    /// The resource exists but belongs to someone else
    AccessDenied,
    /// The completion service rate limited every attempt
    RateLimited,
    /// The completion service rejected our credential
    InvalidCredential,
    /// The completion service refused the request
    Forbidden,
    /// A completion attempt or the whole pipeline timed out
    Timeout,
    /// The completion service kept answering with 5xx
    ServerError,
    /// The completion service could not be reached
    NetworkError,
    /// Generated output never passed the quality gate
    ValidationFailed,
    /// The durable store failed
    StorageError,
    /// Anything else
    Unexpected,
}

impl ErrorCode {
    /// HTTP status used when the code is surfaced over HTTP.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::MissingField => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::AccessDenied => 403,
            ErrorCode::RateLimited => 429,
            ErrorCode::ValidationFailed => 422,
            ErrorCode::Timeout => 408,
            ErrorCode::ServerError | ErrorCode::NetworkError => 503,
            ErrorCode::InvalidCredential
            | ErrorCode::Forbidden
            | ErrorCode::StorageError
            | ErrorCode::Unexpected => 500,
        }
    }

    /// True for codes caused by the caller's own request.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::MissingField | ErrorCode::NotFound | ErrorCode::AccessDenied
        )
    }
}
