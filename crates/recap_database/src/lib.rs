//! PostgreSQL integration for Recap.
//!
//! Provides the diesel schema, embedded migrations, an r2d2 connection pool,
//! and PostgreSQL implementations of
//! [`ResourceDirectory`](recap_interface::ResourceDirectory) and
//! [`SummaryStore`](recap_interface::SummaryStore). Every query runs on a
//! blocking thread via `tokio::task::spawn_blocking`.
//!
//! # Example
//!
//! ```rust,ignore
//! use recap_database::{PostgresSummaryStore, create_pool, migrate};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool(&std::env::var("DATABASE_URL")?, 8)?;
//! migrate(&pool).await?;
//! let store = PostgresSummaryStore::new(pool);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod connection;
mod models;
mod repository;

/// Diesel table definitions.
#[allow(missing_docs)]
pub mod schema;

pub use connection::{DbPool, create_pool, establish_connection, migrate, run_migrations};
pub use models::{MeetingRow, MeetingSummaryRow, NewMeetingRow, NewMeetingSummaryRow};
pub use repository::{PostgresResourceDirectory, PostgresSummaryStore};
