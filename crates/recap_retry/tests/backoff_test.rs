use recap_core::RetryConfig;
use recap_error::CompletionErrorKind;
use recap_retry::{BackoffPolicy, RetryState};
use std::time::Duration;

fn policy() -> BackoffPolicy {
    BackoffPolicy::from(&RetryConfig::default())
}

#[test]
fn computed_delay_doubles_until_capped() {
    let policy = BackoffPolicy::new(
        10,
        Duration::from_millis(1000),
        2.0,
        Duration::from_millis(5000),
        0.1,
    );

    assert_eq!(policy.computed_delay(1), Duration::from_millis(1000));
    assert_eq!(policy.computed_delay(2), Duration::from_millis(2000));
    assert_eq!(policy.computed_delay(3), Duration::from_millis(4000));
    assert_eq!(policy.computed_delay(4), Duration::from_millis(5000));
    assert_eq!(policy.computed_delay(60), Duration::from_millis(5000));
}

#[test]
fn jitter_stays_within_fraction() {
    let policy = policy();

    for attempt in 1..=6 {
        let base = policy.computed_delay(attempt);
        let upper = base.mul_f64(1.0 + policy.jitter_fraction());
        for _ in 0..200 {
            let delay = policy.delay_for(attempt);
            assert!(delay >= base, "attempt {}: {:?} < {:?}", attempt, delay, base);
            assert!(delay <= upper, "attempt {}: {:?} > {:?}", attempt, delay, upper);
        }
    }
}

#[test]
fn jitter_sample_is_applied_linearly() {
    let policy = policy();
    assert_eq!(policy.jittered_delay(1, 0.0), Duration::from_millis(1000));
    assert_eq!(policy.jittered_delay(1, 0.5), Duration::from_millis(1050));
    assert_eq!(policy.jittered_delay(2, 0.5), Duration::from_millis(2100));
}

#[test]
fn schedule_follows_policy() {
    let policy = policy();
    let delays: Vec<_> = policy.schedule().take(3).collect();

    assert_eq!(delays.len(), 3);
    for (i, delay) in delays.into_iter().enumerate() {
        let base = policy.computed_delay(i as u32 + 1);
        assert!(delay >= base);
        assert!(delay <= base.mul_f64(1.1));
    }
}

#[test]
fn policy_normalizes_degenerate_values() {
    let policy = BackoffPolicy::new(
        0,
        Duration::from_millis(10),
        0.5,
        Duration::from_millis(10),
        4.0,
    );
    assert_eq!(policy.max_retries(), 1);
    assert_eq!(policy.jitter_fraction(), 1.0);
    assert_eq!(policy.computed_delay(3), Duration::from_millis(10));
}

#[test]
fn retry_state_tracks_attempts_and_last_failure() {
    let mut state = RetryState::default();
    assert_eq!(state.begin_attempt(), 1);
    state.record_failure(
        CompletionErrorKind::Timeout("slow".to_string()),
        Some(Duration::from_millis(1000)),
    );
    assert_eq!(state.begin_attempt(), 2);

    assert_eq!(state.retries(), 1);
    assert_eq!(state.next_delay, Some(Duration::from_millis(1000)));
    assert_eq!(state.last_error_kind.as_ref().map(|k| k.label()), Some("timeout"));
}
