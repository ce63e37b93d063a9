//! Completion transport errors and retry classification.

use crate::ErrorCode;
use std::time::Duration;

/// Classified failure of a single call to the completion endpoint.
///
/// The kind is assigned once, where the transport error is first observed.
/// Retry decisions and caller-facing codes are derived from the variant,
/// never from the message text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CompletionErrorKind {
    /// The service asked us to slow down (HTTP 429)
    #[display("Rate limited by completion service: {}", message)]
    RateLimited {
        /// Wait requested by the server, if it sent one
        retry_after: Option<Duration>,
        /// Error message
        message: String,
    },
    /// The credential was rejected (HTTP 401)
    #[display("Completion credential rejected: {}", _0)]
    InvalidCredential(String),
    /// The credential lacks permission (HTTP 403)
    #[display("Completion request forbidden: {}", _0)]
    Forbidden(String),
    /// The attempt timed out (HTTP 408/504 or client-side timeout)
    #[display("Completion request timed out: {}", _0)]
    Timeout(String),
    /// The service failed with a 5xx status
    #[display("HTTP {} error from completion service: {}", status_code, message)]
    ServerError {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Connection-level failure before a response arrived
    #[display("Network error reaching completion service: {}", _0)]
    Network(String),
    /// Any failure shape we do not recognize
    #[display("Unclassified completion failure: {}", _0)]
    Unclassified(String),
}

impl CompletionErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            CompletionErrorKind::RateLimited { .. }
            | CompletionErrorKind::Timeout(_)
            | CompletionErrorKind::ServerError { .. }
            | CompletionErrorKind::Network(_) => true,
            CompletionErrorKind::InvalidCredential(_)
            | CompletionErrorKind::Forbidden(_)
            | CompletionErrorKind::Unclassified(_) => false,
        }
    }

    /// Server-supplied wait before the next attempt.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            CompletionErrorKind::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Caller-facing code for this kind.
    pub fn code(&self) -> ErrorCode {
        match self {
            CompletionErrorKind::RateLimited { .. } => ErrorCode::RateLimited,
            CompletionErrorKind::InvalidCredential(_) => ErrorCode::InvalidCredential,
            CompletionErrorKind::Forbidden(_) => ErrorCode::Forbidden,
            CompletionErrorKind::Timeout(_) => ErrorCode::Timeout,
            CompletionErrorKind::ServerError { .. } => ErrorCode::ServerError,
            CompletionErrorKind::Network(_) => ErrorCode::NetworkError,
            CompletionErrorKind::Unclassified(_) => ErrorCode::Unexpected,
        }
    }

    /// Short stable label for logs and metrics fields.
    pub fn label(&self) -> &'static str {
        match self {
            CompletionErrorKind::RateLimited { .. } => "rate_limited",
            CompletionErrorKind::InvalidCredential(_) => "invalid_credential",
            CompletionErrorKind::Forbidden(_) => "forbidden",
            CompletionErrorKind::Timeout(_) => "timeout",
            CompletionErrorKind::ServerError { .. } => "server_error",
            CompletionErrorKind::Network(_) => "network",
            CompletionErrorKind::Unclassified(_) => "unclassified",
        }
    }
}

/// Completion error with source location tracking.
///
/// # Examples
///
/// ```
/// use recap_error::{CompletionError, CompletionErrorKind, RetryableError};
///
/// let err = CompletionError::new(CompletionErrorKind::ServerError {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
/// assert!(err.is_retryable());
/// assert!(format!("{}", err).contains("HTTP 503"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Completion Error: {} at line {} in {}", kind, line, file)]
pub struct CompletionError {
    /// The kind of error that occurred
    pub kind: CompletionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CompletionError {
    /// Create a new CompletionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CompletionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use recap_error::{CompletionError, CompletionErrorKind, RetryableError};
/// use std::time::Duration;
///
/// let err = CompletionError::new(CompletionErrorKind::RateLimited {
///     retry_after: Some(Duration::from_secs(7)),
///     message: "slow down".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Rate limits, timeouts, 5xx responses and network failures are
    /// transient. Credential problems and unknown failure shapes are not.
    fn is_retryable(&self) -> bool;

    /// Wait the server asked for before the next attempt, if any.
    ///
    /// When present this replaces the computed backoff for the immediately
    /// following attempt only.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl RetryableError for CompletionError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_after(&self) -> Option<Duration> {
        self.kind.retry_after()
    }
}

/// Terminal transport failure of one Completion Client invocation.
///
/// Preserves the classification of the last attempt together with the
/// number of attempts made. `suggested_wait` is the delay the client would
/// have waited before another attempt (the server's retry-after when one was
/// given), surfaced to HTTP callers as `Retry-After`.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Generation Error: {} after {} attempt(s) at line {} in {}",
    kind,
    attempts,
    line,
    file
)]
pub struct GenerationError {
    /// Classification of the last attempt
    pub kind: CompletionErrorKind,
    /// Attempts made before giving up
    pub attempts: usize,
    /// Wait a caller should observe before trying again
    pub suggested_wait: Option<Duration>,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(
        kind: CompletionErrorKind,
        attempts: usize,
        suggested_wait: Option<Duration>,
    ) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            attempts,
            suggested_wait,
            line: location.line(),
            file: location.file(),
        }
    }

    /// True when the failure was retryable, so the transport budget ran out.
    pub fn budget_exhausted(&self) -> bool {
        self.kind.is_retryable()
    }
}
