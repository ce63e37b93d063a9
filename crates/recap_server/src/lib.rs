//! HTTP surface for Recap.
//!
//! Exposes the summary pipeline over axum:
//!
//! - `POST /v1/summaries` runs one invocation
//! - `GET /v1/summaries/:resource_id` returns the stored summary to its owner
//! - `GET /health` reports liveness
//!
//! The requester identity is read from a header set by the upstream
//! gateway (`x-requester-id` unless configured otherwise).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod response;
mod server;

pub use api::{ApiState, create_router};
pub use response::{ApiError, ApiResponse};
pub use server::serve;
