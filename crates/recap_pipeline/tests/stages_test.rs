//! Individual pipeline stages: state tracking, quality gate, audit fan-out.

use recap_core::{
    AuditEvent, AuditEventKind, CompletionRequest, GeneratedOutput, ResourceId, SummaryRequest,
};
use recap_error::{ErrorCode, RejectionReason};
use recap_interface::AuditSink;
use recap_models::{ScriptedDriver, ScriptedResponse};
use recap_pipeline::{
    AuditLogger, InvocationState, MemoryAuditSink, OutputValidator, RequestValidator,
    StateTracker,
};
use recap_retry::{BackoffPolicy, CompletionClient};
use recap_storage::InMemoryResourceDirectory;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const GOOD: &str = "Decisions: ship Friday. Owners: Carol updates the runbook, Bob pings finance.";

fn completion_request() -> CompletionRequest {
    CompletionRequest::builder()
        .prompt("Summarize this meeting")
        .model("scripted-model")
        .build()
        .unwrap()
}

fn client(driver: &ScriptedDriver) -> CompletionClient {
    CompletionClient::new(Arc::new(driver.clone()), BackoffPolicy::default())
}

#[test]
fn tracker_starts_in_validating() {
    let tracker = StateTracker::new();
    assert_eq!(tracker.current(), InvocationState::Validating);
    assert!(!tracker.current().is_terminal());
}

#[test]
fn terminal_states_accept_no_successor() {
    for state in [
        InvocationState::DryRunComplete,
        InvocationState::Persisted,
        InvocationState::InputRejected,
        InvocationState::GenerationFailed,
        InvocationState::OutputRejected,
        InvocationState::PersistFailed,
    ] {
        assert!(state.is_terminal(), "{} should be terminal", state);
        assert!(!state.can_advance_to(&InvocationState::Validating));
        assert!(!state.can_advance_to(&InvocationState::Generating { attempt: 1 }));
    }
}

#[test]
fn states_render_in_snake_case() {
    assert_eq!(InvocationState::DryRunComplete.to_string(), "dry_run_complete");
    assert_eq!(InvocationState::PersistFailed.to_string(), "persist_failed");
}

#[test]
fn judge_marks_long_output_accepted() {
    let validator = OutputValidator::new(20, 2);
    let mut output = GeneratedOutput::pending(GOOD);

    assert!(validator.judge(&mut output).is_ok());
    assert!(output.accepted);
}

#[test]
fn judge_measures_trimmed_characters() {
    let validator = OutputValidator::new(10, 2);
    let mut output = GeneratedOutput::pending("   short   \n");

    let reason = validator.judge(&mut output).unwrap_err();
    assert!(matches!(reason, RejectionReason::TooShort { .. }));
    assert!(!output.accepted);
}

#[tokio::test]
async fn quality_retry_walks_through_states() {
    let driver = ScriptedDriver::new(vec![
        ScriptedResponse::text("nope"),
        ScriptedResponse::text(GOOD),
    ]);
    let validator = OutputValidator::new(20, 3);
    let mut tracker = StateTracker::new();
    tracker.advance(InvocationState::Generating { attempt: 1 });

    let accepted = validator
        .generate(&client(&driver), &completion_request(), &mut tracker)
        .await
        .unwrap();

    assert_eq!(accepted.text(), GOOD);
    assert_eq!(accepted.quality_attempts, 2);
    assert_eq!(
        tracker.history(),
        &[
            InvocationState::Validating,
            InvocationState::Generating { attempt: 1 },
            InvocationState::ValidatingOutput { attempt: 1 },
            InvocationState::Generating { attempt: 2 },
            InvocationState::ValidatingOutput { attempt: 2 },
        ]
    );
}

#[tokio::test]
async fn quality_budget_of_one_rejects_immediately() {
    let driver = ScriptedDriver::new(vec![ScriptedResponse::text("nope")]);
    let validator = OutputValidator::new(20, 1);
    let mut tracker = StateTracker::new();
    tracker.advance(InvocationState::Generating { attempt: 1 });

    let err = validator
        .generate(&client(&driver), &completion_request(), &mut tracker)
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    assert_eq!(err.raw_output(), Some("nope"));
    assert_eq!(driver.call_count(), 1);
    assert_eq!(tracker.current(), InvocationState::OutputRejected);
}

#[tokio::test]
async fn transport_failure_ends_in_generation_failed() {
    let driver = ScriptedDriver::failing(recap_error::CompletionErrorKind::Forbidden(
        "model not enabled for this key".to_string(),
    ));
    let validator = OutputValidator::default();
    let mut tracker = StateTracker::new();
    tracker.advance(InvocationState::Generating { attempt: 1 });

    let err = validator
        .generate(&client(&driver), &completion_request(), &mut tracker)
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(tracker.current(), InvocationState::GenerationFailed);
}

#[tokio::test]
async fn validator_checks_fields_in_order() {
    let directory = InMemoryResourceDirectory::new();
    let validator = RequestValidator::new(Arc::new(directory.clone()));

    let err = validator
        .validate(&SummaryRequest::default(), None)
        .await
        .unwrap_err();
    assert!(err.public_message().contains("resourceId"));

    let raw = SummaryRequest {
        resource_id: Some("meeting-1".to_string()),
        ..SummaryRequest::default()
    };
    let err = validator.validate(&raw, Some("alice")).await.unwrap_err();
    assert!(err.public_message().contains("content"));

    let raw = SummaryRequest::new("meeting-1", GOOD, false);
    let err = validator.validate(&raw, Some("  ")).await.unwrap_err();
    assert!(err.public_message().contains("requesterIdentity"));

    assert_eq!(directory.lookup_count(), 0);
}

#[tokio::test]
async fn validator_surfaces_directory_outage_as_storage_error() {
    let directory = InMemoryResourceDirectory::new();
    directory.insert("meeting-1", "alice").await;
    directory.set_unavailable(true);
    let validator = RequestValidator::new(Arc::new(directory));

    let raw = SummaryRequest::new("meeting-1", GOOD, false);
    let err = validator.validate(&raw, Some("alice")).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::StorageError);
}

#[tokio::test]
async fn validator_returns_normalized_request() {
    let directory = InMemoryResourceDirectory::new();
    directory.insert("meeting-1", "alice").await;
    let validator = RequestValidator::new(Arc::new(directory));

    let raw = SummaryRequest::new("meeting-1", GOOD, true);
    let request = validator.validate(&raw, Some("alice")).await.unwrap();

    assert_eq!(request.resource_id().as_str(), "meeting-1");
    assert_eq!(request.requester().as_str(), "alice");
    assert!(*request.dry_run());
}

struct CountingSink(AtomicUsize);

impl AuditSink for CountingSink {
    fn record(&self, _event: &AuditEvent) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

struct ExplodingSink;

impl AuditSink for ExplodingSink {
    fn record(&self, _event: &AuditEvent) {
        panic!("sink failure");
    }
}

#[test]
fn logger_isolates_panicking_sinks() {
    let counting = Arc::new(CountingSink(AtomicUsize::new(0)));
    let memory = MemoryAuditSink::new();
    let sinks: Vec<Arc<dyn AuditSink>> = vec![
        Arc::new(ExplodingSink),
        counting.clone(),
        Arc::new(memory.clone()),
    ];
    let logger = AuditLogger::new(
        sinks,
        200,
        "meeting-summary-v1",
    );

    logger.record(
        &ResourceId::new("meeting-1"),
        GOOD,
        AuditEventKind::DryRunCompleted,
    );
    logger.record(
        &ResourceId::new("meeting-2"),
        GOOD,
        AuditEventKind::DryRunCompleted,
    );

    assert_eq!(counting.0.load(Ordering::SeqCst), 2);
    assert_eq!(memory.len(), 2);
    assert_eq!(memory.events()[1].prompt_version, "meeting-summary-v1");
}
