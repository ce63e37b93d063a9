//! Completion endpoint request and response types.

use serde::{Deserialize, Serialize};

/// One call to the text-completion endpoint.
///
/// # Examples
///
/// ```
/// use recap_core::CompletionRequest;
///
/// let request = CompletionRequest::builder()
///     .prompt("Summarize: ...")
///     .model("gpt-4o-mini")
///     .temperature(0.2)
///     .max_tokens(512u32)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.model, "gpt-4o-mini");
/// assert!(request.system_prompt.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct CompletionRequest {
    /// User prompt, including the transcript
    pub prompt: String,
    /// Optional system instructions
    #[builder(default)]
    pub system_prompt: Option<String>,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    #[builder(default = "0.2")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[builder(default = "1024")]
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Creates a new builder.
    pub fn builder() -> CompletionRequestBuilder {
        CompletionRequestBuilder::default()
    }
}

/// Text returned by the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text
    pub text: String,
    /// Model that produced it, as reported by the endpoint
    pub model: String,
}
