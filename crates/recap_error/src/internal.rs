//! Internal fault error types.

/// Unexpected internal fault (task join failure, broken invariant).
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Internal Error: {} at line {} in {}", message, line, file)]
pub struct InternalError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl InternalError {
    /// Create a new InternalError with the given message at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
