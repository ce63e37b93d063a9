//! Summary generation pipeline for Recap.
//!
//! One invocation moves a raw request through five stages:
//!
//! - **Request validation**: required fields, resource existence, ownership
//! - **Generation**: a completion call under the transport retry budget
//! - **Output validation**: a quality gate with its own attempt budget
//! - **Persistence**: an upsert keyed by resource, skipped on dry runs
//! - **Audit**: terminal failures and dry runs, never affecting the result
//!
//! # Example
//!
//! ```rust,ignore
//! use recap_pipeline::Summarizer;
//! use recap_core::SummaryRequest;
//!
//! let summarizer = Summarizer::builder(driver, directory, store)
//!     .config(&config)
//!     .build();
//!
//! let request = SummaryRequest::new("meeting-42", transcript, false);
//! let response = summarizer.handle(&request, Some("user-7")).await;
//! println!("{}", serde_json::to_string(&response)?);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod audit;
mod output_validator;
mod persistence;
mod request_validator;
mod state;
mod summarizer;

pub use audit::{AuditLogger, MemoryAuditSink, TracingAuditSink};
pub use output_validator::{AcceptedOutput, OutputValidator};
pub use persistence::PersistenceWriter;
pub use request_validator::RequestValidator;
pub use state::{InvocationState, StateTracker};
pub use summarizer::{DryRunResult, Outcome, PersistedResult, Summarizer, SummarizerBuilder};
