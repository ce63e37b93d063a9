//! Recap - meeting summary generation.
//!
//! Recap turns a meeting transcript into a stored summary through a fixed
//! pipeline: request validation, a completion call with bounded retries,
//! a quality gate with its own budget, and an idempotent upsert. Dry runs
//! skip the write. Terminal failures are reported to pluggable audit sinks.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use recap::{Backends, RecapConfig, SummaryRequest, build_summarizer, driver_from_config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RecapConfig::load()?;
//!     let backends = Backends::connect(&config.database).await?;
//!     let driver = driver_from_config(&config.completion)?;
//!     let summarizer = build_summarizer(&config, driver, &backends);
//!
//!     let request = SummaryRequest::new("meeting-42", "Alice: ...", true);
//!     let response = summarizer.handle(&request, Some("alice")).await;
//!     println!("{}", serde_json::to_string_pretty(&response)?);
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `database` (default) - PostgreSQL backend
//! - `observability` - OpenTelemetry stdout span exporter
//!
//! # Architecture
//!
//! - `recap_error` - Error taxonomy and caller-facing codes
//! - `recap_core` - Data model and configuration
//! - `recap_interface` - Collaborator traits
//! - `recap_retry` - Backoff policy and retrying completion client
//! - `recap_models` - OpenAI-compatible driver and scripted driver
//! - `recap_storage` - In-memory directory and store
//! - `recap_database` - PostgreSQL directory and store
//! - `recap_pipeline` - Validators, persistence, audit, orchestrator
//! - `recap_server` - HTTP routes
//!
//! This crate (`recap`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod app;
mod backend;
pub mod observability;

pub use app::{build_summarizer, driver_from_config};
pub use backend::Backends;

// Re-export core crates (always available)
pub use recap_core::*;
pub use recap_error::*;
pub use recap_interface::*;
pub use recap_models::{OpenAiCompatClient, OpenAiConfig, ScriptedDriver, ScriptedResponse};
pub use recap_pipeline::*;
pub use recap_retry::{BackoffPolicy, Completion, CompletionClient};
pub use recap_server::{ApiState, create_router, serve};
pub use recap_storage::*;

#[cfg(feature = "database")]
pub use recap_database::{DbPool, PostgresResourceDirectory, PostgresSummaryStore};
