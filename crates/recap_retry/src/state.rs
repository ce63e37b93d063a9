//! Per-invocation retry bookkeeping.

use recap_error::CompletionErrorKind;
use std::time::Duration;

/// Progress of one completion client invocation.
///
/// Lives only as long as the invocation. The client keeps it behind a
/// `parking_lot::Mutex` that is locked briefly and never across an await.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryState {
    /// Attempts started so far
    pub attempt_count: u32,
    /// Classification of the most recent failure
    pub last_error_kind: Option<CompletionErrorKind>,
    /// Wait chosen after the most recent failure
    pub next_delay: Option<Duration>,
}

impl RetryState {
    /// Count a new attempt and return its number, starting at 1.
    pub fn begin_attempt(&mut self) -> u32 {
        self.attempt_count += 1;
        self.attempt_count
    }

    /// Remember a failed attempt and the wait that follows it.
    pub fn record_failure(&mut self, kind: CompletionErrorKind, next_delay: Option<Duration>) {
        self.last_error_kind = Some(kind);
        self.next_delay = next_delay;
    }

    /// Retries made beyond the first attempt.
    pub fn retries(&self) -> u32 {
        self.attempt_count.saturating_sub(1)
    }
}
