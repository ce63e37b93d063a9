//! Output quality gate and its retry loop.

use crate::{InvocationState, StateTracker};
use recap_core::{CompletionRequest, GeneratedOutput, QualityConfig};
use recap_error::{RecapResult, RejectionReason, ValidationError};
use recap_retry::{Completion, CompletionClient};
use tracing::{info, instrument, warn};

/// A generation the quality gate accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedOutput {
    /// The accepted completion and its transport attempts
    pub completion: Completion,
    /// Generations judged, including the accepted one
    pub quality_attempts: u32,
}

impl AcceptedOutput {
    /// Accepted text.
    pub fn text(&self) -> &str {
        &self.completion.response.text
    }
}

/// Judges generated text and re-invokes the completion client on rejection.
///
/// The quality budget is separate from the client's transport budget:
/// each re-invocation gets a fresh transport budget, and `max_attempts`
/// counts generations judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputValidator {
    min_chars: usize,
    max_attempts: u32,
}

impl Default for OutputValidator {
    fn default() -> Self {
        Self::from(&QualityConfig::default())
    }
}

impl From<&QualityConfig> for OutputValidator {
    fn from(config: &QualityConfig) -> Self {
        Self::new(config.min_chars, config.max_attempts)
    }
}

impl OutputValidator {
    /// Reject trimmed output shorter than `min_chars`, judging at most
    /// `max_attempts` generations (at least one).
    pub fn new(min_chars: usize, max_attempts: u32) -> Self {
        Self {
            min_chars,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Quality budget.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Judge one output, marking it accepted when it passes.
    ///
    /// ```
    /// use recap_core::GeneratedOutput;
    /// use recap_pipeline::OutputValidator;
    ///
    /// let gate = OutputValidator::new(5, 2);
    /// let mut output = GeneratedOutput::pending("  four  ");
    /// assert!(gate.judge(&mut output).is_err());
    /// assert!(!output.accepted);
    /// ```
    pub fn judge(&self, output: &mut GeneratedOutput) -> Result<(), RejectionReason> {
        let length = output.trimmed_len();
        if length < self.min_chars {
            output.accepted = false;
            return Err(RejectionReason::TooShort {
                length,
                minimum: self.min_chars,
            });
        }
        output.accepted = true;
        Ok(())
    }

    /// Generate until an output passes or the quality budget runs out.
    ///
    /// # Errors
    ///
    /// Propagates the client's transport failure unchanged, or returns
    /// `VALIDATION_FAILED` carrying the last rejected text.
    #[instrument(skip_all, fields(max_attempts = self.max_attempts, min_chars = self.min_chars))]
    pub async fn generate(
        &self,
        client: &CompletionClient,
        request: &CompletionRequest,
        tracker: &mut StateTracker,
    ) -> RecapResult<AcceptedOutput> {
        let mut attempt = 1;
        loop {
            let completion = match client.complete(request).await {
                Ok(completion) => completion,
                Err(e) => {
                    tracker.advance(InvocationState::GenerationFailed);
                    return Err(e.into());
                }
            };

            tracker.advance(InvocationState::ValidatingOutput { attempt });
            let mut output = GeneratedOutput::pending(completion.response.text.clone());
            match self.judge(&mut output) {
                Ok(()) => {
                    info!(attempt, "Output accepted");
                    return Ok(AcceptedOutput {
                        completion,
                        quality_attempts: attempt,
                    });
                }
                Err(reason) if attempt >= self.max_attempts => {
                    warn!(attempt, %reason, "Quality budget exhausted");
                    tracker.advance(InvocationState::OutputRejected);
                    return Err(ValidationError::new(reason, output.text, attempt as usize).into());
                }
                Err(reason) => {
                    warn!(attempt, %reason, "Output rejected, generating again");
                    attempt += 1;
                    tracker.advance(InvocationState::Generating { attempt });
                }
            }
        }
    }
}
