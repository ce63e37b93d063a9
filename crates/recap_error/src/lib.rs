//! Error types for the Recap summary orchestrator.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! The four caller-visible classes map onto these families:
//!
//! | Class | Type | Retried |
//! |---|---|---|
//! | Input | [`RequestError`] | never |
//! | Transport | [`CompletionError`] per attempt, [`GenerationError`] when terminal | up to the transport budget |
//! | Quality | [`ValidationError`] | up to the quality budget |
//! | Persistence | [`StorageError`] | never |
//!
//! Every family folds into [`RecapError`], which knows its [`ErrorCode`],
//! HTTP status, and the only message that may be shown to a caller.
//!
//! # Examples
//!
//! ```
//! use recap_error::{ErrorCode, RecapResult, RequestError, RequestErrorKind};
//!
//! fn check(content: &str) -> RecapResult<()> {
//!     if content.trim().is_empty() {
//!         Err(RequestError::new(RequestErrorKind::MissingField("content".to_string())))?
//!     }
//!     Ok(())
//! }
//!
//! let err = check("").unwrap_err();
//! assert_eq!(err.code(), ErrorCode::MissingField);
//! assert_eq!(err.http_status(), 400);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod code;
mod completion;
mod config;
mod deadline;
mod error;
mod internal;
mod request;
mod storage;
mod validation;

pub use code::ErrorCode;
pub use completion::{CompletionError, CompletionErrorKind, GenerationError, RetryableError};
pub use config::ConfigError;
pub use deadline::DeadlineError;
pub use error::{RecapError, RecapErrorKind, RecapResult};
pub use internal::InternalError;
pub use request::{RequestError, RequestErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use validation::{RejectionReason, ValidationError};
