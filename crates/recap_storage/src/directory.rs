//! In-memory resource directory.

use async_trait::async_trait;
use recap_core::{RequesterId, ResourceId};
use recap_error::{StorageError, StorageErrorKind};
use recap_interface::ResourceDirectory;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::instrument;

/// Map of meeting ids to their owners.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResourceDirectory {
    owners: Arc<RwLock<HashMap<ResourceId, RequesterId>>>,
    lookups: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryResourceDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource and its owner, replacing any previous owner.
    pub async fn insert(&self, resource_id: impl Into<ResourceId>, owner: impl Into<RequesterId>) {
        self.owners
            .write()
            .await
            .insert(resource_id.into(), owner.into());
    }

    /// Number of `owner_of` calls made (for testing).
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Make every lookup fail with a storage error (for testing).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl ResourceDirectory for InMemoryResourceDirectory {
    #[instrument(skip(self), fields(resource_id = %resource_id))]
    async fn owner_of(&self, resource_id: &ResourceId) -> Result<Option<RequesterId>, StorageError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::new(StorageErrorKind::Unavailable(
                "resource directory offline".to_string(),
            )));
        }
        Ok(self.owners.read().await.get(resource_id).cloned())
    }
}
