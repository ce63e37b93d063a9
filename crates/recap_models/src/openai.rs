//! HTTP driver for OpenAI-compatible chat completion endpoints.

use crate::{
    ChatCompletionRequest, ChatCompletionResponse, classify_status, classify_transport,
    parse_retry_after,
};
use async_trait::async_trait;
use chrono::Utc;
use recap_core::{CompletionConfig, CompletionRequest, CompletionResponse};
use recap_error::{CompletionError, CompletionErrorKind, ConfigError};
use recap_interface::CompletionDriver;
use reqwest::header::RETRY_AFTER;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Connection settings for [`OpenAiCompatClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiConfig {
    /// Base URL, without the `/v1/...` path
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Bearer token
    pub api_key: Option<String>,
    /// Per-attempt timeout covering connect, send and body read
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Create a configuration with a 60 second timeout and no API key.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
            timeout: Duration::from_secs(60),
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl From<&CompletionConfig> for OpenAiConfig {
    fn from(config: &CompletionConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key(),
            timeout: config.request_timeout(),
        }
    }
}

/// Single-attempt client for `POST {base_url}/v1/chat/completions`.
#[derive(Debug, Clone)]
pub struct OpenAiCompatClient {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be constructed.
    #[instrument(skip(config), fields(base_url = %config.base_url, model = %config.model))]
    pub fn new(config: OpenAiConfig) -> Result<Self, ConfigError> {
        debug!("Creating completion client");
        if config.api_key.is_none() {
            warn!("No API key configured; requests will be sent unauthenticated");
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Get the client configuration
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionDriver for OpenAiCompatClient {
    #[instrument(skip(self, req), fields(model = %req.model))]
    async fn complete(
        &self,
        req: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let url = self.endpoint();
        debug!("Sending chat completion request to {}", url);

        let mut builder = self
            .client
            .post(&url)
            .json(&ChatCompletionRequest::from(req));
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("Request failed: {}", e);
            CompletionError::new(classify_transport(&e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| parse_retry_after(value, Utc::now()));
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Completion endpoint returned error");
            return Err(CompletionError::new(classify_status(
                status.as_u16(),
                retry_after,
                &body,
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::new(classify_transport(&e)))?;

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            CompletionError::new(CompletionErrorKind::Unclassified(format!(
                "Failed to parse completion response: {}",
                e
            )))
        })?;

        let text = match parsed.first_text() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => {
                return Err(CompletionError::new(CompletionErrorKind::Unclassified(
                    "Completion response contained no text".to_string(),
                )));
            }
        };

        let model = if parsed.model.is_empty() {
            req.model.clone()
        } else {
            parsed.model
        };

        debug!(chars = text.len(), "Chat completion successful");
        Ok(CompletionResponse { text, model })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
