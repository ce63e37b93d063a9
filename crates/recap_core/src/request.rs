//! Invocation request types.

use crate::{RequesterId, ResourceId};
use serde::{Deserialize, Serialize};

/// Raw invocation body as it arrives from a caller.
///
/// Every field is optional so that absent and blank values can both be
/// reported as a missing field instead of a decode failure.
///
/// # Examples
///
/// ```
/// use recap_core::SummaryRequest;
///
/// let raw: SummaryRequest =
///     serde_json::from_str(r#"{"resourceId":"mtg-1","content":"Alice: hi"}"#).unwrap();
/// assert_eq!(raw.resource_id.as_deref(), Some("mtg-1"));
/// assert!(!raw.dry_run());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    /// Meeting to summarize
    #[serde(default)]
    pub resource_id: Option<String>,
    /// Transcript text
    #[serde(default)]
    pub content: Option<String>,
    /// Skip persistence when true
    #[serde(default)]
    pub dry_run: Option<bool>,
}

impl SummaryRequest {
    /// Build a request with all fields present.
    pub fn new(
        resource_id: impl Into<String>,
        content: impl Into<String>,
        dry_run: bool,
    ) -> Self {
        Self {
            resource_id: Some(resource_id.into()),
            content: Some(content.into()),
            dry_run: Some(dry_run),
        }
    }

    /// Dry-run flag with the `false` default applied.
    pub fn dry_run(&self) -> bool {
        self.dry_run.unwrap_or(false)
    }
}

/// A request that passed input and ownership checks.
///
/// Created once per invocation by the request validator and discarded after
/// the response is produced.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct GenerationRequest {
    /// Meeting being summarized
    resource_id: ResourceId,
    /// Non-empty transcript text
    content: String,
    /// Skip persistence when true
    dry_run: bool,
    /// Identity that owns the meeting
    requester: RequesterId,
}

impl GenerationRequest {
    /// Assemble a validated request.
    pub fn new(
        resource_id: ResourceId,
        content: impl Into<String>,
        dry_run: bool,
        requester: RequesterId,
    ) -> Self {
        Self {
            resource_id,
            content: content.into(),
            dry_run,
            requester,
        }
    }
}
