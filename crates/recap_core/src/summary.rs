//! Persisted summary rows.

use crate::ResourceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Values the persistence writer upserts for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct NewSummary {
    /// Meeting the summary belongs to (the upsert key)
    resource_id: ResourceId,
    /// Accepted summary text
    text: String,
    /// Model that produced the text
    model_identifier: String,
    /// Prompt template version used
    prompt_version: String,
    /// Wall time from request receipt to acceptance
    processing_duration_ms: u64,
    /// Transport retries spent on the accepted completion
    retry_attempts: u32,
}

impl NewSummary {
    /// Collect the values for an upsert.
    pub fn new(
        resource_id: ResourceId,
        text: impl Into<String>,
        model_identifier: impl Into<String>,
        prompt_version: impl Into<String>,
        processing_duration_ms: u64,
        retry_attempts: u32,
    ) -> Self {
        Self {
            resource_id,
            text: text.into(),
            model_identifier: model_identifier.into(),
            prompt_version: prompt_version.into(),
            processing_duration_ms,
            retry_attempts,
        }
    }
}

/// The single durable summary row for a resource.
///
/// `id` and `created_at` survive overwrites of the same resource; every
/// other field reflects the most recent successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSummary {
    /// Row identifier
    pub id: Uuid,
    /// Meeting the summary belongs to
    pub resource_id: ResourceId,
    /// Summary text
    pub text: String,
    /// Model that produced the text
    pub model_identifier: String,
    /// Prompt template version used
    pub prompt_version: String,
    /// Processing time of the run that wrote this row
    pub processing_duration_ms: u64,
    /// Transport retries of the run that wrote this row
    pub retry_attempts: u32,
    /// First write
    pub created_at: DateTime<Utc>,
    /// Most recent write
    pub updated_at: DateTime<Utc>,
}

impl PersistedSummary {
    /// Materialize a row from upsert values.
    pub fn from_new(
        new: NewSummary,
        id: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            resource_id: new.resource_id,
            text: new.text,
            model_identifier: new.model_identifier,
            prompt_version: new.prompt_version,
            processing_duration_ms: new.processing_duration_ms,
            retry_attempts: new.retry_attempts,
            created_at,
            updated_at,
        }
    }
}
