//! Retrying completion client.

use crate::{BackoffPolicy, BackoffSchedule, RetryState};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use parking_lot::Mutex;
use recap_core::{CompletionRequest, CompletionResponse};
use recap_error::{GenerationError, RetryableError};
use recap_interface::CompletionDriver;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, info, instrument, warn};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// A successful completion and what it cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// The accepted response
    pub response: CompletionResponse,
    /// Attempts made, including the successful one
    pub attempts: u32,
}

impl Completion {
    /// Retries spent beyond the first attempt.
    pub fn retries(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }
}

/// Completion client enforcing the transport retry budget.
///
/// Each call to [`complete`](Self::complete) starts a fresh budget of
/// `max_retries` attempts. Non-retryable failures end the call after the
/// attempt that produced them.
///
/// # Example
///
/// ```rust,ignore
/// use recap_retry::{BackoffPolicy, CompletionClient};
///
/// let client = CompletionClient::new(driver, BackoffPolicy::default())
///     .with_requests_per_minute(Some(60));
/// let completion = client.complete(&request).await?;
/// println!("{} retries", completion.retries());
/// ```
#[derive(Clone)]
pub struct CompletionClient {
    driver: Arc<dyn CompletionDriver>,
    policy: BackoffPolicy,
    limiter: Option<Arc<DirectRateLimiter>>,
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("provider", &self.driver.provider_name())
            .field("model", &self.driver.model_name())
            .field("policy", &self.policy)
            .field("rate_limited", &self.limiter.is_some())
            .finish()
    }
}

impl CompletionClient {
    /// Create a client around a driver.
    pub fn new(driver: Arc<dyn CompletionDriver>, policy: BackoffPolicy) -> Self {
        Self {
            driver,
            policy,
            limiter: None,
        }
    }

    /// Cap attempts at `rpm` per minute across every invocation sharing
    /// this client. `None` or zero disables the cap.
    pub fn with_requests_per_minute(mut self, rpm: Option<u32>) -> Self {
        self.limiter = rpm
            .and_then(NonZeroU32::new)
            .map(|n| Arc::new(RateLimiter::direct(Quota::per_minute(n))));
        self
    }

    /// Retry policy in effect.
    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Model identifier of the underlying driver.
    pub fn model_name(&self) -> &str {
        self.driver.model_name()
    }

    /// Run one completion invocation under the retry budget.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] carrying the last attempt's
    /// classification, the number of attempts made, and the wait that would
    /// have preceded another attempt.
    #[instrument(
        skip(self, request),
        fields(
            provider = self.driver.provider_name(),
            model = %request.model,
            max_retries = self.policy.max_retries()
        )
    )]
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<Completion, GenerationError> {
        let max_retries = self.policy.max_retries();
        let state = Mutex::new(RetryState::default());
        let state_ref = &state;

        let strategy = ChosenDelays {
            state: state_ref,
            fallback: self.policy.schedule(),
        }
        .take(max_retries.saturating_sub(1) as usize);

        let result = Retry::spawn(strategy, || async move {
            if let Some(limiter) = &self.limiter {
                limiter.until_ready().await;
            }

            let attempt = state_ref.lock().begin_attempt();
            debug!(attempt, "Starting completion attempt");

            match self.driver.complete(request).await {
                Ok(response) => Ok(response),
                Err(e) => {
                    if !e.is_retryable() {
                        warn!(
                            attempt,
                            kind = e.kind.label(),
                            "Permanent error, failing immediately: {}",
                            e
                        );
                        state_ref.lock().record_failure(e.kind.clone(), None);
                        return Err(RetryError::Permanent(e));
                    }

                    let delay = e
                        .retry_after()
                        .unwrap_or_else(|| self.policy.delay_for(attempt));
                    state_ref.lock().record_failure(e.kind.clone(), Some(delay));

                    if attempt >= max_retries {
                        warn!(attempt, kind = e.kind.label(), "Retry budget exhausted: {}", e);
                        return Err(RetryError::Permanent(e));
                    }

                    warn!(
                        attempt,
                        kind = e.kind.label(),
                        delay_ms = delay.as_millis() as u64,
                        "Transient error, will retry: {}",
                        e
                    );
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: Some(delay),
                    })
                }
            }
        })
        .await;

        let state = state.into_inner();
        match result {
            Ok(response) => {
                info!(attempts = state.attempt_count, "Completion succeeded");
                Ok(Completion {
                    response,
                    attempts: state.attempt_count,
                })
            }
            Err(e) => Err(GenerationError::new(
                e.kind,
                state.attempt_count as usize,
                state.next_delay,
            )),
        }
    }
}

/// Retry strategy yielding the wait recorded in [`RetryState::next_delay`]
/// by the attempt that just failed, or the next scheduled backoff when none
/// was recorded.
struct ChosenDelays<'a> {
    state: &'a Mutex<RetryState>,
    fallback: BackoffSchedule,
}

impl Iterator for ChosenDelays<'_> {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let fallback = self.fallback.next();
        self.state.lock().next_delay.or(fallback)
    }
}
