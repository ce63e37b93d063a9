//! Row types for the summary tables.

use crate::schema::{meeting_summaries, meetings};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use recap_core::{NewSummary, PersistedSummary, ResourceId};
use uuid::Uuid;

/// A row of `meeting_summaries`.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = meeting_summaries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MeetingSummaryRow {
    /// Row identifier
    pub id: Uuid,
    /// Owning meeting
    pub resource_id: String,
    /// Summary text
    pub text: String,
    /// Model that produced the text
    pub model_identifier: String,
    /// Prompt template version
    pub prompt_version: String,
    /// Processing time of the writing run
    pub processing_duration_ms: i64,
    /// Transport retries of the writing run
    pub retry_attempts: i32,
    /// First write
    pub created_at: NaiveDateTime,
    /// Most recent write
    pub updated_at: NaiveDateTime,
}

impl From<MeetingSummaryRow> for PersistedSummary {
    fn from(row: MeetingSummaryRow) -> Self {
        Self {
            id: row.id,
            resource_id: ResourceId::new(row.resource_id),
            text: row.text,
            model_identifier: row.model_identifier,
            prompt_version: row.prompt_version,
            processing_duration_ms: u64::try_from(row.processing_duration_ms).unwrap_or(0),
            retry_attempts: u32::try_from(row.retry_attempts).unwrap_or(0),
            created_at: row.created_at.and_utc(),
            updated_at: row.updated_at.and_utc(),
        }
    }
}

/// Insert values for `meeting_summaries`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = meeting_summaries)]
pub struct NewMeetingSummaryRow<'a> {
    /// Row identifier, used only when no row exists yet
    pub id: Uuid,
    /// Owning meeting (the conflict target)
    pub resource_id: &'a str,
    /// Summary text
    pub text: &'a str,
    /// Model that produced the text
    pub model_identifier: &'a str,
    /// Prompt template version
    pub prompt_version: &'a str,
    /// Processing time
    pub processing_duration_ms: i64,
    /// Transport retries
    pub retry_attempts: i32,
    /// Creation time, ignored on conflict
    pub created_at: NaiveDateTime,
    /// Write time
    pub updated_at: NaiveDateTime,
}

impl<'a> NewMeetingSummaryRow<'a> {
    /// Borrow insert values from a summary.
    pub fn from_summary(summary: &'a NewSummary, id: Uuid, now: NaiveDateTime) -> Self {
        Self {
            id,
            resource_id: summary.resource_id().as_str(),
            text: summary.text(),
            model_identifier: summary.model_identifier(),
            prompt_version: summary.prompt_version(),
            processing_duration_ms: i64::try_from(*summary.processing_duration_ms())
                .unwrap_or(i64::MAX),
            retry_attempts: i32::try_from(*summary.retry_attempts()).unwrap_or(i32::MAX),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A row of `meetings`.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = meetings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MeetingRow {
    /// Meeting identifier
    pub id: String,
    /// Owning identity
    pub owner_id: String,
    /// Optional display title
    pub title: Option<String>,
    /// Creation time
    pub created_at: NaiveDateTime,
}

/// Insert values for `meetings`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = meetings)]
pub struct NewMeetingRow<'a> {
    /// Meeting identifier
    pub id: &'a str,
    /// Owning identity
    pub owner_id: &'a str,
    /// Optional display title
    pub title: Option<&'a str>,
}
