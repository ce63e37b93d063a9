//! Whole-pipeline deadline errors.

use std::time::Duration;

/// The invocation did not finish within its overall deadline.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Deadline Error: pipeline exceeded {:?} at line {} in {}", budget, line, file)]
pub struct DeadlineError {
    /// The deadline that was exceeded
    pub budget: Duration,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl DeadlineError {
    /// Create a new DeadlineError at the current location.
    #[track_caller]
    pub fn new(budget: Duration) -> Self {
        let location = std::panic::Location::caller();
        Self {
            budget,
            line: location.line(),
            file: location.file(),
        }
    }
}
