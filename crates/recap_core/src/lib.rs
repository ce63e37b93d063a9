//! Core data types for the Recap summary orchestrator.
//!
//! This crate provides the types shared by every Recap crate: the request
//! and response envelopes, the persisted summary row, the prompt template,
//! audit events, and the layered configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod audit;
mod completion;
mod config;
mod ids;
mod output;
mod prompt;
mod request;
mod response;
mod summary;

pub use audit::{AuditEvent, AuditEventKind, input_sample};
pub use completion::{CompletionRequest, CompletionRequestBuilder, CompletionResponse};
pub use config::{
    CompletionConfig, DatabaseConfig, PipelineConfig, QualityConfig, RecapConfig, RetryConfig,
    ServerConfig, StorageBackend,
};
pub use ids::{RequesterId, ResourceId};
pub use output::GeneratedOutput;
pub use prompt::PromptTemplate;
pub use request::{GenerationRequest, SummaryRequest};
pub use response::{FailureBody, SuccessBody, SummaryResponse};
pub use summary::{NewSummary, PersistedSummary};
