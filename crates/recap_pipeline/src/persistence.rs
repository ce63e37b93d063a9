//! Persistence writer.

use recap_core::{NewSummary, PersistedSummary};
use recap_error::StorageError;
use recap_interface::SummaryStore;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Upserts accepted summaries, one row per resource.
///
/// Storage failures are returned as they are and never retried.
#[derive(Clone)]
pub struct PersistenceWriter {
    store: Arc<dyn SummaryStore>,
}

impl std::fmt::Debug for PersistenceWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceWriter").finish_non_exhaustive()
    }
}

impl PersistenceWriter {
    /// Create a writer over a summary store.
    pub fn new(store: Arc<dyn SummaryStore>) -> Self {
        Self { store }
    }

    /// Insert or overwrite the summary for its resource.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged.
    #[instrument(skip_all, fields(resource_id = %summary.resource_id()))]
    pub async fn write(&self, summary: NewSummary) -> Result<PersistedSummary, StorageError> {
        match self.store.upsert(summary).await {
            Ok(row) => {
                info!(id = %row.id, "Summary persisted");
                Ok(row)
            }
            Err(e) => {
                error!("Failed to persist summary: {}", e);
                Err(e)
            }
        }
    }
}
