//! In-memory collaborators for Recap.
//!
//! Both types keep their data behind `Arc<tokio::sync::RwLock<HashMap>>` and
//! count the calls made against them, which the pipeline tests use to prove
//! that rejected requests make no external calls and dry runs never write.
//!
//! ```rust
//! use recap_core::{NewSummary, RequesterId, ResourceId};
//! use recap_interface::{ResourceDirectory, SummaryStore};
//! use recap_storage::{InMemoryResourceDirectory, InMemorySummaryStore};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let directory = InMemoryResourceDirectory::new();
//! directory.insert("mtg-1", "alice").await;
//! assert_eq!(
//!     directory.owner_of(&ResourceId::new("mtg-1")).await?,
//!     Some(RequesterId::new("alice"))
//! );
//!
//! let store = InMemorySummaryStore::new();
//! let row = store
//!     .upsert(NewSummary::new(ResourceId::new("mtg-1"), "text", "model", "v1", 12, 0))
//!     .await?;
//! assert_eq!(store.write_count(), 1);
//! assert_eq!(store.get(&ResourceId::new("mtg-1")).await?, Some(row));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod directory;
mod summaries;

pub use directory::InMemoryResourceDirectory;
pub use summaries::InMemorySummaryStore;
