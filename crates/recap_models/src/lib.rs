//! Completion drivers for Recap.
//!
//! - [`OpenAiCompatClient`]: HTTP driver for any OpenAI-compatible
//!   `/v1/chat/completions` endpoint
//! - [`ScriptedDriver`]: replays a fixed sequence of outcomes, for tests and
//!   offline runs
//!
//! Every transport failure is classified exactly once, here, by the
//! functions in [`classify_status`] and [`classify_transport`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chat;
mod classify;
mod openai;
mod scripted;

pub use chat::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, ChoiceMessage, Usage,
};
pub use classify::{classify_status, classify_transport, parse_retry_after};
pub use openai::{OpenAiCompatClient, OpenAiConfig};
pub use scripted::{ScriptedDriver, ScriptedResponse};
