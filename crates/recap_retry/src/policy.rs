//! Backoff policy and delay schedule.

use recap_core::RetryConfig;
use std::time::Duration;

/// Retry budget and delay curve for one completion client.
///
/// # Examples
///
/// ```
/// use recap_retry::BackoffPolicy;
/// use std::time::Duration;
///
/// let policy = BackoffPolicy::default();
/// assert_eq!(policy.max_retries(), 3);
/// assert_eq!(policy.computed_delay(1), Duration::from_millis(1000));
/// assert_eq!(policy.computed_delay(3), Duration::from_millis(4000));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    max_retries: u32,
    base_delay: Duration,
    multiplier: f64,
    max_delay: Duration,
    jitter_fraction: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for BackoffPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.base_delay_ms),
            config.multiplier,
            Duration::from_millis(config.max_delay_ms),
            config.jitter_fraction,
        )
    }
}

impl BackoffPolicy {
    /// Create a policy. A `max_retries` of zero is treated as one attempt and
    /// `jitter_fraction` is clamped to `[0, 1]`.
    pub fn new(
        max_retries: u32,
        base_delay: Duration,
        multiplier: f64,
        max_delay: Duration,
        jitter_fraction: f64,
    ) -> Self {
        Self {
            max_retries: max_retries.max(1),
            base_delay,
            multiplier: multiplier.max(1.0),
            max_delay,
            jitter_fraction: jitter_fraction.clamp(0.0, 1.0),
        }
    }

    /// Total attempts one invocation may make.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Jitter fraction.
    pub fn jitter_fraction(&self) -> f64 {
        self.jitter_fraction
    }

    /// Capped delay after attempt `attempt` failed, before jitter.
    ///
    /// Attempts are numbered from 1.
    pub fn computed_delay(&self, attempt: u32) -> Duration {
        Duration::from_micros(self.computed_micros(attempt).ceil() as u64)
    }

    /// Delay after attempt `attempt` failed, with random jitter applied.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.jittered_delay(attempt, rand::random::<f64>())
    }

    /// Delay after attempt `attempt` failed for a given jitter sample in `[0, 1)`.
    pub fn jittered_delay(&self, attempt: u32, sample: f64) -> Duration {
        let sample = sample.clamp(0.0, 1.0);
        let micros = self.computed_micros(attempt) * (1.0 + self.jitter_fraction * sample);
        Duration::from_micros(micros.ceil() as u64)
    }

    /// Infinite schedule of jittered delays starting after attempt 1.
    pub fn schedule(&self) -> BackoffSchedule {
        BackoffSchedule {
            policy: self.clone(),
            attempt: 1,
        }
    }

    fn computed_micros(&self, attempt: u32) -> f64 {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let raw = self.base_delay.as_micros() as f64 * self.multiplier.powi(exponent);
        raw.min(self.max_delay.as_micros() as f64)
    }
}

/// Endless iterator of jittered backoff delays, one per failed attempt,
/// starting with the wait after attempt 1.
#[derive(Debug, Clone)]
pub struct BackoffSchedule {
    policy: BackoffPolicy,
    attempt: u32,
}

impl Iterator for BackoffSchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let delay = self.policy.delay_for(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        Some(delay)
    }
}
