//! In-memory summary store.

use async_trait::async_trait;
use chrono::Utc;
use recap_core::{NewSummary, PersistedSummary, ResourceId};
use recap_error::{StorageError, StorageErrorKind};
use recap_interface::SummaryStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Summary rows keyed by resource.
///
/// Upserts replace the row for a resource in place, keeping its id and
/// creation time. All data is lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemorySummaryStore {
    rows: Arc<RwLock<HashMap<ResourceId, PersistedSummary>>>,
    writes: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl InMemorySummaryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows (for testing).
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Check if the store is empty (for testing).
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Number of `upsert` calls made, including failed ones (for testing).
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every operation fail with a storage error (for testing).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StorageError::new(StorageErrorKind::Unavailable(
                "summary store offline".to_string(),
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SummaryStore for InMemorySummaryStore {
    #[instrument(skip(self, summary), fields(resource_id = %summary.resource_id()))]
    async fn upsert(&self, summary: NewSummary) -> Result<PersistedSummary, StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let now = Utc::now();
        let mut rows = self.rows.write().await;
        let (id, created_at) = match rows.get(summary.resource_id()) {
            Some(existing) => (existing.id, existing.created_at),
            None => (Uuid::new_v4(), now),
        };

        let row = PersistedSummary::from_new(summary, id, created_at, now);
        rows.insert(row.resource_id.clone(), row.clone());
        debug!(id = %row.id, "Summary upserted");
        Ok(row)
    }

    #[instrument(skip(self), fields(resource_id = %resource_id))]
    async fn get(&self, resource_id: &ResourceId) -> Result<Option<PersistedSummary>, StorageError> {
        self.check_available()?;
        Ok(self.rows.read().await.get(resource_id).cloned())
    }
}
