//! Completion client with bounded retry, exponential backoff and jitter.
//!
//! [`CompletionClient`] wraps a [`CompletionDriver`](recap_interface::CompletionDriver)
//! and turns single classified attempts into one invocation that either
//! succeeds or ends with a [`GenerationError`](recap_error::GenerationError)
//! preserving the last classification.
//!
//! Delay before attempt `n + 1`, after attempt `n` failed:
//!
//! ```text
//! min(max_delay, base_delay * multiplier^(n-1)) * (1 + jitter_fraction * r),  r in [0, 1)
//! ```
//!
//! A server-supplied retry-after replaces the computed delay for the next
//! attempt only and never adds attempts.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod policy;
mod state;

pub use client::{Completion, CompletionClient};
pub use policy::{BackoffPolicy, BackoffSchedule};
pub use state::RetryState;
