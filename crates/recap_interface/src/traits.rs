//! Collaborator traits.

use async_trait::async_trait;
use recap_core::{
    AuditEvent, CompletionRequest, CompletionResponse, NewSummary, PersistedSummary, RequesterId,
    ResourceId,
};
use recap_error::{CompletionError, StorageError};

/// A text-completion backend.
///
/// One call is one attempt. Implementations classify every failure into a
/// [`CompletionErrorKind`](recap_error::CompletionErrorKind) at the point
/// where it is observed and never retry on their own.
#[async_trait]
pub trait CompletionDriver: Send + Sync {
    /// Make a single completion attempt.
    async fn complete(&self, req: &CompletionRequest)
    -> Result<CompletionResponse, CompletionError>;

    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &'static str;

    /// Model identifier written to persisted summaries.
    fn model_name(&self) -> &str;
}

/// Answers who owns a resource.
#[async_trait]
pub trait ResourceDirectory: Send + Sync {
    /// Owner of `resource_id`, or `None` when the resource does not exist.
    async fn owner_of(&self, resource_id: &ResourceId) -> Result<Option<RequesterId>, StorageError>;
}

/// Durable summary storage keyed by resource.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Insert the summary for a resource, or overwrite the existing one.
    ///
    /// There is never more than one row per resource. The row id and
    /// creation time of an existing row are kept.
    async fn upsert(&self, summary: NewSummary) -> Result<PersistedSummary, StorageError>;

    /// The stored summary for a resource, if any.
    async fn get(&self, resource_id: &ResourceId) -> Result<Option<PersistedSummary>, StorageError>;
}

/// Receives audit events.
///
/// Recording is fire-and-forget: a sink has no way to report failure and
/// must not block for long.
pub trait AuditSink: Send + Sync {
    /// Record one event.
    fn record(&self, event: &AuditEvent);
}
