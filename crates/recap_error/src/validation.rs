//! Output quality errors.

/// Why the quality gate rejected a generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RejectionReason {
    /// Trimmed output is shorter than the configured minimum
    #[display("output has {} characters after trimming, minimum is {}", length, minimum)]
    TooShort {
        /// Trimmed length in characters
        length: usize,
        /// Required minimum
        minimum: usize,
    },
}

/// The quality budget ran out without an accepted generation.
///
/// Carries the last rejected text so it can be audited and returned to the
/// caller as `rawOutput`.
///
/// # Examples
///
/// ```
/// use recap_error::{RejectionReason, ValidationError};
///
/// let err = ValidationError::new(
///     RejectionReason::TooShort { length: 10, minimum: 50 },
///     "too short.",
///     2,
/// );
/// assert_eq!(err.raw_output, "too short.");
/// assert_eq!(err.attempts, 2);
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Validation Error: {} after {} attempt(s) at line {} in {}",
    reason,
    attempts,
    line,
    file
)]
pub struct ValidationError {
    /// Reason the last generation was rejected
    pub reason: RejectionReason,
    /// Text of the last rejected generation
    pub raw_output: String,
    /// Generations judged before giving up
    pub attempts: usize,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(reason: RejectionReason, raw_output: impl Into<String>, attempts: usize) -> Self {
        let location = std::panic::Location::caller();
        Self {
            reason,
            raw_output: raw_output.into(),
            attempts,
            line: location.line(),
            file: location.file(),
        }
    }
}
