//! Database connection utilities.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use recap_error::{StorageError, StorageErrorKind};
use tracing::{info, instrument};

/// Pooled PostgreSQL connections.
pub type DbPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Establish a single connection.
///
/// # Errors
///
/// Returns a connection error if the database is unreachable.
pub fn establish_connection(database_url: &str) -> Result<PgConnection, StorageError> {
    PgConnection::establish(database_url).map_err(StorageError::from)
}

/// Build a connection pool holding at most `pool_size` connections.
///
/// # Errors
///
/// Returns a pool error if the first connection cannot be opened.
#[instrument(skip(database_url))]
pub fn create_pool(database_url: &str, pool_size: u32) -> Result<DbPool, StorageError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(pool_size)
        .build(manager)
        .map_err(|e| StorageError::new(StorageErrorKind::Pool(e.to_string())))?;
    info!(pool_size, "Database pool ready");
    Ok(pool)
}

/// Run pending migrations.
///
/// # Errors
///
/// Returns a migration error if any migration fails to apply.
pub fn run_migrations(conn: &mut PgConnection) -> Result<(), StorageError> {
    conn.run_pending_migrations(MIGRATIONS)
        .map(|applied| info!(count = applied.len(), "Migrations applied"))
        .map_err(|e| StorageError::new(StorageErrorKind::Migration(e.to_string())))
}

/// Run pending migrations on a blocking thread using a pooled connection.
///
/// # Errors
///
/// Returns a pool or migration error.
pub async fn migrate(pool: &DbPool) -> Result<(), StorageError> {
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        run_migrations(&mut conn)
    })
    .await
    .map_err(join_error)?
}

/// Storage error for a blocking task that panicked or was cancelled.
pub(crate) fn join_error(err: tokio::task::JoinError) -> StorageError {
    StorageError::new(StorageErrorKind::Unavailable(format!(
        "Task join error: {}",
        err
    )))
}
