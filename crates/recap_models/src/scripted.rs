//! Scripted completion driver.

use async_trait::async_trait;
use parking_lot::Mutex;
use recap_core::{CompletionRequest, CompletionResponse};
use recap_error::{CompletionError, CompletionErrorKind};
use recap_interface::CompletionDriver;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// One scripted outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedResponse {
    /// Return this text
    Text(String),
    /// Fail with this classification
    Error(CompletionErrorKind),
}

impl ScriptedResponse {
    /// Successful completion with `text`.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Retryable 5xx failure.
    pub fn server_error(status_code: u16) -> Self {
        Self::Error(CompletionErrorKind::ServerError {
            status_code,
            message: format!("HTTP {}", status_code),
        })
    }

    /// Rate limit, optionally with a server-supplied wait.
    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        Self::Error(CompletionErrorKind::RateLimited {
            retry_after,
            message: "HTTP 429".to_string(),
        })
    }
}

/// Completion driver that replays a fixed sequence of outcomes.
///
/// Once the script runs out, the last entry repeats. Every call is counted
/// and its request recorded, so tests can assert how often the endpoint was
/// hit and with what prompt.
///
/// # Examples
///
/// ```
/// use recap_models::{ScriptedDriver, ScriptedResponse};
///
/// let driver = ScriptedDriver::new(vec![
///     ScriptedResponse::server_error(503),
///     ScriptedResponse::text("A summary long enough to pass."),
/// ]);
/// assert_eq!(driver.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedDriver {
    script: Arc<Mutex<VecDeque<ScriptedResponse>>>,
    last: Arc<Mutex<Option<ScriptedResponse>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    latency: Option<Duration>,
    model_name: String,
}

impl ScriptedDriver {
    /// Replay `responses` in order.
    pub fn new(responses: Vec<ScriptedResponse>) -> Self {
        Self {
            script: Arc::new(Mutex::new(responses.into())),
            last: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
            latency: None,
            model_name: "scripted-model".to_string(),
        }
    }

    /// Always succeed with `text`.
    pub fn always(text: impl Into<String>) -> Self {
        Self::new(vec![ScriptedResponse::text(text)])
    }

    /// Always fail with `kind`.
    pub fn failing(kind: CompletionErrorKind) -> Self {
        Self::new(vec![ScriptedResponse::Error(kind)])
    }

    /// Sleep this long (on the tokio clock) before answering each call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Report a different model identifier.
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Number of times `complete` was called.
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    fn next_response(&self) -> Option<ScriptedResponse> {
        let next = self.script.lock().pop_front();
        let mut last = self.last.lock();
        match next {
            Some(response) => {
                *last = Some(response.clone());
                Some(response)
            }
            None => last.clone(),
        }
    }
}

#[async_trait]
impl CompletionDriver for ScriptedDriver {
    async fn complete(
        &self,
        req: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        self.requests.lock().push(req.clone());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match self.next_response() {
            Some(ScriptedResponse::Text(text)) => Ok(CompletionResponse {
                text,
                model: self.model_name.clone(),
            }),
            Some(ScriptedResponse::Error(kind)) => Err(CompletionError::new(kind)),
            None => Err(CompletionError::new(CompletionErrorKind::Unclassified(
                "Scripted driver has no responses".to_string(),
            ))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
