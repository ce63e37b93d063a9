//! Audit event types.

use crate::ResourceId;
use recap_error::ErrorCode;
use serde::{Deserialize, Serialize};

/// What happened to an invocation worth recording off the response path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AuditEventKind {
    /// A dry run produced accepted text that was not stored
    DryRunCompleted,
    /// The quality budget ran out
    ValidationExhausted {
        /// Last rejected generation
        rejected_output: String,
        /// Generations judged
        attempts: usize,
    },
    /// The completion client gave up
    TransportFailed {
        /// Classification of the last attempt
        error_code: ErrorCode,
        /// Attempts made
        attempts: usize,
        /// True when every attempt was retryable and the budget ran out
        budget_exhausted: bool,
    },
    /// Accepted text could not be stored
    PersistFailed {
        /// The text that was generated but not stored
        generated_text: String,
        /// Storage failure detail
        message: String,
    },
}

impl AuditEventKind {
    /// Short stable label for log fields.
    pub fn label(&self) -> &'static str {
        match self {
            AuditEventKind::DryRunCompleted => "dry_run_completed",
            AuditEventKind::ValidationExhausted { .. } => "validation_exhausted",
            AuditEventKind::TransportFailed { .. } => "transport_failed",
            AuditEventKind::PersistFailed { .. } => "persist_failed",
        }
    }
}

/// One audit record.
///
/// # Examples
///
/// ```
/// use recap_core::{AuditEvent, AuditEventKind, ResourceId};
///
/// let event = AuditEvent::new(
///     ResourceId::new("mtg-7"),
///     "Alice: let's start",
///     200,
///     "meeting-summary-v1",
///     AuditEventKind::DryRunCompleted,
/// );
/// assert_eq!(event.kind.label(), "dry_run_completed");
/// assert_eq!(event.input_sample, "Alice: let's start");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    /// Meeting the invocation targeted
    pub resource_id: ResourceId,
    /// Leading characters of the transcript
    pub input_sample: String,
    /// Prompt template version in effect
    pub prompt_version: String,
    /// What happened
    #[serde(flatten)]
    pub kind: AuditEventKind,
}

impl AuditEvent {
    /// Build an event, truncating `content` to `sample_chars` characters.
    pub fn new(
        resource_id: ResourceId,
        content: &str,
        sample_chars: usize,
        prompt_version: impl Into<String>,
        kind: AuditEventKind,
    ) -> Self {
        Self {
            resource_id,
            input_sample: input_sample(content, sample_chars),
            prompt_version: prompt_version.into(),
            kind,
        }
    }
}

/// First `max_chars` characters of `content`, never splitting a character.
///
/// ```
/// use recap_core::input_sample;
///
/// assert_eq!(input_sample("héllo wörld", 4), "héll");
/// assert_eq!(input_sample("short", 200), "short");
/// ```
pub fn input_sample(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => content[..idx].to_string(),
        None => content.to_string(),
    }
}
