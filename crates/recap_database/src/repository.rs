//! PostgreSQL resource directory and summary store.

use crate::connection::{DbPool, join_error};
use crate::models::{MeetingRow, MeetingSummaryRow, NewMeetingRow, NewMeetingSummaryRow};
use crate::schema::{meeting_summaries, meetings};
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use recap_core::{NewSummary, PersistedSummary, RequesterId, ResourceId};
use recap_error::StorageError;
use recap_interface::{ResourceDirectory, SummaryStore};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Meeting ownership backed by the `meetings` table.
#[derive(Clone)]
pub struct PostgresResourceDirectory {
    pool: DbPool,
}

impl std::fmt::Debug for PostgresResourceDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresResourceDirectory")
            .field("pool_size", &self.pool.max_size())
            .finish()
    }
}

impl PostgresResourceDirectory {
    /// Create a directory over a connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Register a meeting, or reassign its owner if it already exists.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    #[instrument(skip(self, title))]
    pub async fn register(
        &self,
        resource_id: &str,
        owner_id: &str,
        title: Option<&str>,
    ) -> Result<(), StorageError> {
        let pool = self.pool.clone();
        let resource_id = resource_id.to_string();
        let owner_id = owner_id.to_string();
        let title = title.map(str::to_string);

        tokio::task::spawn_blocking(move || -> Result<(), StorageError> {
            let mut conn = pool.get()?;

            diesel::insert_into(meetings::table)
                .values(&NewMeetingRow {
                    id: &resource_id,
                    owner_id: &owner_id,
                    title: title.as_deref(),
                })
                .on_conflict(meetings::id)
                .do_update()
                .set((
                    meetings::owner_id.eq(excluded(meetings::owner_id)),
                    meetings::title.eq(excluded(meetings::title)),
                ))
                .execute(&mut conn)?;

            debug!(resource_id = %resource_id, "Meeting registered");
            Ok(())
        })
        .await
        .map_err(join_error)?
    }
}

#[async_trait]
impl ResourceDirectory for PostgresResourceDirectory {
    #[instrument(skip(self), fields(resource_id = %resource_id))]
    async fn owner_of(&self, resource_id: &ResourceId) -> Result<Option<RequesterId>, StorageError> {
        let pool = self.pool.clone();
        let resource_id = resource_id.as_str().to_string();

        tokio::task::spawn_blocking(move || -> Result<Option<RequesterId>, StorageError> {
            let mut conn = pool.get()?;

            let row = meetings::table
                .find(resource_id.as_str())
                .select(MeetingRow::as_select())
                .first(&mut conn)
                .optional()?;

            Ok(row.map(|meeting| RequesterId::new(meeting.owner_id)))
        })
        .await
        .map_err(join_error)?
    }
}

/// Summary rows backed by the `meeting_summaries` table.
///
/// Writes are `INSERT ... ON CONFLICT (resource_id) DO UPDATE`, so a
/// resource never has more than one row and the first row's id and
/// `created_at` survive every overwrite.
#[derive(Clone)]
pub struct PostgresSummaryStore {
    pool: DbPool,
}

impl std::fmt::Debug for PostgresSummaryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresSummaryStore")
            .field("pool_size", &self.pool.max_size())
            .finish()
    }
}

impl PostgresSummaryStore {
    /// Create a store over a connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SummaryStore for PostgresSummaryStore {
    #[instrument(skip(self, summary), fields(resource_id = %summary.resource_id()))]
    async fn upsert(&self, summary: NewSummary) -> Result<PersistedSummary, StorageError> {
        debug!("Upserting meeting summary");
        let pool = self.pool.clone();

        // Run blocking database operation in dedicated thread pool
        let row = tokio::task::spawn_blocking(move || -> Result<MeetingSummaryRow, StorageError> {
            let mut conn = pool.get()?;
            let now = Utc::now().naive_utc();

            let row = diesel::insert_into(meeting_summaries::table)
                .values(&NewMeetingSummaryRow::from_summary(&summary, Uuid::new_v4(), now))
                .on_conflict(meeting_summaries::resource_id)
                .do_update()
                .set((
                    meeting_summaries::text.eq(excluded(meeting_summaries::text)),
                    meeting_summaries::model_identifier
                        .eq(excluded(meeting_summaries::model_identifier)),
                    meeting_summaries::prompt_version
                        .eq(excluded(meeting_summaries::prompt_version)),
                    meeting_summaries::processing_duration_ms
                        .eq(excluded(meeting_summaries::processing_duration_ms)),
                    meeting_summaries::retry_attempts
                        .eq(excluded(meeting_summaries::retry_attempts)),
                    meeting_summaries::updated_at.eq(excluded(meeting_summaries::updated_at)),
                ))
                .returning(MeetingSummaryRow::as_returning())
                .get_result(&mut conn)?;

            Ok(row)
        })
        .await
        .map_err(join_error)??;

        info!(id = %row.id, "Meeting summary saved to database");
        Ok(row.into())
    }

    #[instrument(skip(self), fields(resource_id = %resource_id))]
    async fn get(&self, resource_id: &ResourceId) -> Result<Option<PersistedSummary>, StorageError> {
        let pool = self.pool.clone();
        let resource_id = resource_id.as_str().to_string();

        tokio::task::spawn_blocking(move || -> Result<Option<PersistedSummary>, StorageError> {
            let mut conn = pool.get()?;

            let row = meeting_summaries::table
                .filter(meeting_summaries::resource_id.eq(resource_id.as_str()))
                .select(MeetingSummaryRow::as_select())
                .first(&mut conn)
                .optional()?;

            Ok(row.map(PersistedSummary::from))
        })
        .await
        .map_err(join_error)?
    }
}
