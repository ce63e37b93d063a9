//! Trait definitions for the Recap summary orchestrator.
//!
//! The orchestrator talks to every external collaborator through one of
//! these traits, so each can be swapped for a test double or another
//! backend without touching pipeline logic.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{AuditSink, CompletionDriver, ResourceDirectory, SummaryStore};
