//! Invocation state machine.

use tracing::{debug, warn};

/// Where one invocation is in the pipeline.
///
/// ```text
/// Validating -> Generating(1..M) -> ValidatingOutput(1..M) -> DryRunComplete
///                    ^                     |              \-> Persisting -> Persisted
///                    \---------------------/                            \-> PersistFailed
/// ```
///
/// The attempt number counts generations judged by the quality gate;
/// transport retries happen inside a single `Generating` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum InvocationState {
    /// Checking input fields and ownership
    Validating,
    /// Waiting on the completion client
    Generating {
        /// Quality attempt this generation belongs to
        attempt: u32,
    },
    /// Judging generated text
    ValidatingOutput {
        /// Quality attempt being judged
        attempt: u32,
    },
    /// Writing the accepted summary
    Persisting,
    /// Dry run finished with accepted text
    DryRunComplete,
    /// Accepted summary stored
    Persisted,
    /// Input rejected before any external call
    InputRejected,
    /// Completion client gave up
    GenerationFailed,
    /// Quality budget exhausted
    OutputRejected,
    /// Accepted summary could not be stored
    PersistFailed,
}

impl InvocationState {
    /// True once the invocation has ended.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InvocationState::DryRunComplete
                | InvocationState::Persisted
                | InvocationState::InputRejected
                | InvocationState::GenerationFailed
                | InvocationState::OutputRejected
                | InvocationState::PersistFailed
        )
    }

    /// Whether `next` is a legal successor of this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use recap_pipeline::InvocationState;
    ///
    /// let judging = InvocationState::ValidatingOutput { attempt: 1 };
    /// assert!(judging.can_advance_to(&InvocationState::Generating { attempt: 2 }));
    /// assert!(!judging.can_advance_to(&InvocationState::Generating { attempt: 1 }));
    /// assert!(!InvocationState::Persisted.can_advance_to(&InvocationState::Validating));
    /// ```
    pub fn can_advance_to(&self, next: &InvocationState) -> bool {
        use InvocationState::*;

        match (self, next) {
            (Validating, Generating { attempt: 1 }) | (Validating, InputRejected) => true,
            (Generating { attempt: a }, ValidatingOutput { attempt: b }) => a == b,
            (Generating { .. }, GenerationFailed) => true,
            (ValidatingOutput { attempt: a }, Generating { attempt: b }) => *b == a + 1,
            (ValidatingOutput { .. }, DryRunComplete)
            | (ValidatingOutput { .. }, Persisting)
            | (ValidatingOutput { .. }, OutputRejected) => true,
            (Persisting, Persisted) | (Persisting, PersistFailed) => true,
            _ => false,
        }
    }
}

/// Tracks the current state of one invocation and logs each transition.
#[derive(Debug, Clone)]
pub struct StateTracker {
    current: InvocationState,
    history: Vec<InvocationState>,
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StateTracker {
    /// Start in [`InvocationState::Validating`].
    pub fn new() -> Self {
        Self {
            current: InvocationState::Validating,
            history: vec![InvocationState::Validating],
        }
    }

    /// Current state.
    pub fn current(&self) -> InvocationState {
        self.current
    }

    /// Every state visited, in order.
    pub fn history(&self) -> &[InvocationState] {
        &self.history
    }

    /// Move to `next`. Illegal transitions are logged and still applied.
    pub fn advance(&mut self, next: InvocationState) {
        if self.current.can_advance_to(&next) {
            debug!(from = %self.current, to = %next, "State transition");
        } else {
            warn!(from = %self.current, to = %next, "Unexpected state transition");
        }
        self.current = next;
        self.history.push(next);
    }
}
