//! Storage backend selection.

use recap_core::{DatabaseConfig, StorageBackend};
use recap_error::RecapResult;
use recap_interface::{ResourceDirectory, SummaryStore};
use recap_storage::{InMemoryResourceDirectory, InMemorySummaryStore};
use std::sync::Arc;
use tracing::info;

#[cfg(feature = "database")]
use recap_database::{PostgresResourceDirectory, PostgresSummaryStore, create_pool, migrate};

#[derive(Clone)]
enum Registry {
    Memory(InMemoryResourceDirectory),
    #[cfg(feature = "database")]
    Postgres(PostgresResourceDirectory),
}

/// Resource directory and summary store chosen by `database.backend`.
#[derive(Clone)]
pub struct Backends {
    registry: Registry,
    store: Arc<dyn SummaryStore>,
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends")
            .field("backend", &self.backend())
            .finish_non_exhaustive()
    }
}

impl Backends {
    /// Process-local directory and store.
    pub fn in_memory() -> Self {
        Self {
            registry: Registry::Memory(InMemoryResourceDirectory::new()),
            store: Arc::new(InMemorySummaryStore::new()),
        }
    }

    /// Connect to the configured backend, running migrations for Postgres.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the backend is unavailable in this
    /// build or its URL is unset, or a storage error when connecting or
    /// migrating fails.
    pub async fn connect(config: &DatabaseConfig) -> RecapResult<Self> {
        match config.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage; summaries are lost on exit");
                Ok(Self::in_memory())
            }
            StorageBackend::Postgres => Self::postgres(config).await,
        }
    }

    #[cfg(feature = "database")]
    async fn postgres(config: &DatabaseConfig) -> RecapResult<Self> {
        let url = config.url()?;
        let pool = create_pool(&url, config.pool_size)?;
        migrate(&pool).await?;
        info!(pool_size = config.pool_size, "Connected to PostgreSQL");

        Ok(Self {
            registry: Registry::Postgres(PostgresResourceDirectory::new(pool.clone())),
            store: Arc::new(PostgresSummaryStore::new(pool)),
        })
    }

    #[cfg(not(feature = "database"))]
    async fn postgres(_config: &DatabaseConfig) -> RecapResult<Self> {
        Err(recap_error::ConfigError::new(
            "database.backend = \"postgres\" requires the `database` feature",
        )
        .into())
    }

    /// Backend in use.
    pub fn backend(&self) -> StorageBackend {
        match self.registry {
            Registry::Memory(_) => StorageBackend::Memory,
            #[cfg(feature = "database")]
            Registry::Postgres(_) => StorageBackend::Postgres,
        }
    }

    /// Directory handle for the pipeline.
    pub fn directory(&self) -> Arc<dyn ResourceDirectory> {
        match &self.registry {
            Registry::Memory(directory) => Arc::new(directory.clone()),
            #[cfg(feature = "database")]
            Registry::Postgres(directory) => Arc::new(directory.clone()),
        }
    }

    /// Store handle for the pipeline.
    pub fn store(&self) -> Arc<dyn SummaryStore> {
        self.store.clone()
    }

    /// Record `owner` as the owner of `resource_id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the directory write fails.
    pub async fn register(
        &self,
        resource_id: &str,
        owner: &str,
        title: Option<&str>,
    ) -> RecapResult<()> {
        match &self.registry {
            Registry::Memory(directory) => {
                directory.insert(resource_id, owner).await;
            }
            #[cfg(feature = "database")]
            Registry::Postgres(directory) => {
                directory.register(resource_id, owner, title).await?;
            }
        }
        info!(resource_id, owner, title, "Resource registered");
        Ok(())
    }
}
