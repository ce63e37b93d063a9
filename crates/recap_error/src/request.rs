//! Input error types.

/// Request rejections caused by the caller. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RequestErrorKind {
    /// A required field is absent or blank
    #[display("Missing required field: {}", _0)]
    MissingField(String),
    /// The resource does not exist
    #[display("Resource '{}' not found", _0)]
    NotFound(String),
    /// The resource exists but is owned by another identity
    #[display("Requester '{}' does not own resource '{}'", requester, resource_id)]
    AccessDenied {
        /// Resource that was requested
        resource_id: String,
        /// Identity that asked for it
        requester: String,
    },
}

/// Request error with location tracking.
///
/// # Examples
///
/// ```
/// use recap_error::{RequestError, RequestErrorKind};
///
/// let err = RequestError::new(RequestErrorKind::NotFound("mtg-42".to_string()));
/// assert!(format!("{}", err).contains("mtg-42"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Request Error: {} at line {} in {}", kind, line, file)]
pub struct RequestError {
    /// The kind of error that occurred
    pub kind: RequestErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RequestError {
    /// Create a new request error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RequestErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
