//! Top-level error wrapper types.

use crate::{
    CompletionErrorKind, ConfigError, DeadlineError, ErrorCode, GenerationError, InternalError,
    RequestError, RequestErrorKind, StorageError, ValidationError,
};
use std::time::Duration;

/// Every error family an invocation can end with.
///
/// # Examples
///
/// ```
/// use recap_error::{RecapError, StorageError, StorageErrorKind};
///
/// let storage = StorageError::new(StorageErrorKind::Query("deadlock".to_string()));
/// let err: RecapError = storage.into();
/// assert!(format!("{}", err).contains("Storage Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum RecapErrorKind {
    /// Input rejected before any external call
    #[from(RequestError)]
    Request(RequestError),
    /// Transport failure after the retry policy gave up
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Output never passed the quality gate
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Durable store failure
    #[from(StorageError)]
    Storage(StorageError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Whole-pipeline deadline exceeded
    #[from(DeadlineError)]
    Deadline(DeadlineError),
    /// Internal fault
    #[from(InternalError)]
    Internal(InternalError),
}

/// Recap error with kind discrimination.
///
/// # Examples
///
/// ```
/// use recap_error::{ConfigError, ErrorCode, RecapResult};
///
/// fn might_fail() -> RecapResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert_eq!(err.code(), ErrorCode::Unexpected);
/// assert_eq!(err.public_message(), "An unexpected error occurred");
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Recap Error: {}", _0)]
pub struct RecapError(Box<RecapErrorKind>);

impl RecapError {
    /// Create a new error from a kind.
    pub fn new(kind: RecapErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RecapErrorKind {
        &self.0
    }

    /// Caller-facing error code.
    pub fn code(&self) -> ErrorCode {
        match self.kind() {
            RecapErrorKind::Request(e) => match e.kind {
                RequestErrorKind::MissingField(_) => ErrorCode::MissingField,
                RequestErrorKind::NotFound(_) => ErrorCode::NotFound,
                RequestErrorKind::AccessDenied { .. } => ErrorCode::AccessDenied,
            },
            RecapErrorKind::Generation(e) => e.kind.code(),
            RecapErrorKind::Validation(_) => ErrorCode::ValidationFailed,
            RecapErrorKind::Storage(_) => ErrorCode::StorageError,
            RecapErrorKind::Deadline(_) => ErrorCode::Timeout,
            RecapErrorKind::Config(_) | RecapErrorKind::Internal(_) => ErrorCode::Unexpected,
        }
    }

    /// HTTP status for [`code`](Self::code).
    pub fn http_status(&self) -> u16 {
        self.code().http_status()
    }

    /// Last rejected generation, present only for quality failures.
    pub fn raw_output(&self) -> Option<&str> {
        match self.kind() {
            RecapErrorKind::Validation(e) => Some(e.raw_output.as_str()),
            _ => None,
        }
    }

    /// Wait a caller should observe before retrying a rate-limited request.
    pub fn retry_after(&self) -> Option<Duration> {
        match self.kind() {
            RecapErrorKind::Generation(e) if e.kind.code() == ErrorCode::RateLimited => {
                e.suggested_wait
            }
            _ => None,
        }
    }

    /// Human-readable message safe to show to callers.
    ///
    /// Never includes upstream response bodies, database text, or source
    /// locations; those stay in the `Display` output for logs.
    pub fn public_message(&self) -> String {
        match self.kind() {
            RecapErrorKind::Request(e) => match &e.kind {
                RequestErrorKind::MissingField(field) => {
                    format!("Missing required field '{}'", field)
                }
                RequestErrorKind::NotFound(id) => format!("Resource '{}' was not found", id),
                RequestErrorKind::AccessDenied { resource_id, .. } => {
                    format!("Access to resource '{}' is denied", resource_id)
                }
            },
            RecapErrorKind::Generation(e) => generation_message(e),
            RecapErrorKind::Validation(e) => format!(
                "Generated summary did not meet the quality bar after {} attempt(s): {}",
                e.attempts, e.reason
            ),
            RecapErrorKind::Storage(_) => "The summary could not be stored".to_string(),
            RecapErrorKind::Deadline(e) => format!(
                "Summary generation exceeded its {}s deadline",
                e.budget.as_secs()
            ),
            RecapErrorKind::Config(_) | RecapErrorKind::Internal(_) => {
                "An unexpected error occurred".to_string()
            }
        }
    }
}

fn generation_message(err: &GenerationError) -> String {
    match &err.kind {
        CompletionErrorKind::RateLimited { .. } => match err.suggested_wait {
            Some(wait) => format!(
                "The completion service is rate limiting requests; retry after {} seconds",
                wait.as_secs().max(1)
            ),
            None => "The completion service is rate limiting requests; retry later".to_string(),
        },
        CompletionErrorKind::InvalidCredential(_) => {
            "The completion service rejected the configured credential".to_string()
        }
        CompletionErrorKind::Forbidden(_) => {
            "The completion service refused the request".to_string()
        }
        CompletionErrorKind::Timeout(_) => format!(
            "The completion service timed out after {} attempt(s)",
            err.attempts
        ),
        CompletionErrorKind::ServerError { status_code, .. } => format!(
            "The completion service is unavailable (HTTP {}) after {} attempt(s)",
            status_code, err.attempts
        ),
        CompletionErrorKind::Network(_) => format!(
            "The completion service could not be reached after {} attempt(s)",
            err.attempts
        ),
        CompletionErrorKind::Unclassified(_) => {
            "The completion service returned an unexpected response".to_string()
        }
    }
}

// Generic From implementation for any type that converts to RecapErrorKind
impl<T> From<T> for RecapError
where
    T: Into<RecapErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Recap operations.
pub type RecapResult<T> = std::result::Result<T, RecapError>;
