//! Summary orchestrator.

use crate::{
    AcceptedOutput, AuditLogger, InvocationState, OutputValidator, PersistenceWriter,
    RequestValidator, StateTracker, TracingAuditSink,
};
use recap_core::{
    AuditEventKind, GenerationRequest, NewSummary, PersistedSummary, PromptTemplate, RecapConfig,
    RequesterId, ResourceId, SummaryRequest, SummaryResponse,
};
use recap_error::{
    DeadlineError, RecapError, RecapErrorKind, RecapResult, RequestError, RequestErrorKind,
};
use recap_interface::{AuditSink, CompletionDriver, ResourceDirectory, SummaryStore};
use recap_retry::{BackoffPolicy, CompletionClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, instrument, warn};

/// Accepted text that was deliberately not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunResult {
    /// Accepted summary text
    pub text: String,
    /// Wall time of the invocation
    pub processing_duration_ms: u64,
    /// Transport retries spent on the accepted completion
    pub retry_attempts: u32,
    /// Generations judged
    pub quality_attempts: u32,
}

/// Accepted text that was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedResult {
    /// The stored row
    pub summary: PersistedSummary,
    /// Wall time up to the write
    pub processing_duration_ms: u64,
    /// Transport retries spent on the accepted completion
    pub retry_attempts: u32,
    /// Generations judged
    pub quality_attempts: u32,
}

/// How a successful invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Persistence was skipped
    DryRun(DryRunResult),
    /// The summary was upserted
    Persisted(PersistedResult),
}

impl Outcome {
    /// Accepted summary text.
    pub fn text(&self) -> &str {
        match self {
            Outcome::DryRun(result) => &result.text,
            Outcome::Persisted(result) => &result.summary.text,
        }
    }
}

impl From<Outcome> for SummaryResponse {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::DryRun(result) => SummaryResponse::success(
                result.text,
                true,
                result.processing_duration_ms,
                result.retry_attempts,
                result.quality_attempts,
                None,
            ),
            Outcome::Persisted(result) => SummaryResponse::success(
                result.summary.text,
                false,
                result.processing_duration_ms,
                result.retry_attempts,
                result.quality_attempts,
                Some(result.summary.id.to_string()),
            ),
        }
    }
}

/// Runs one summary invocation end to end.
///
/// Request validation, generation under the transport budget, the quality
/// gate under its own budget, then either a dry-run result or an upsert.
/// Terminal failures and dry runs are reported to the audit logger, which
/// never influences the result.
#[derive(Clone)]
pub struct Summarizer {
    validator: RequestValidator,
    client: CompletionClient,
    output_validator: OutputValidator,
    writer: PersistenceWriter,
    store: Arc<dyn SummaryStore>,
    audit: AuditLogger,
    prompt: PromptTemplate,
    model: String,
    temperature: f32,
    max_tokens: u32,
    deadline: Option<Duration>,
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("client", &self.client)
            .field("output_validator", &self.output_validator)
            .field("prompt_version", &self.prompt.version())
            .field("model", &self.model)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl Summarizer {
    /// Start building a summarizer from its collaborators.
    pub fn builder(
        driver: Arc<dyn CompletionDriver>,
        directory: Arc<dyn ResourceDirectory>,
        store: Arc<dyn SummaryStore>,
    ) -> SummarizerBuilder {
        SummarizerBuilder {
            driver,
            directory,
            store,
            config: RecapConfig::default(),
            sinks: Vec::new(),
            prompt: None,
        }
    }

    /// Run one invocation and return its outcome or classified error.
    ///
    /// # Errors
    ///
    /// Any input, transport, quality, or storage error, or `TIMEOUT` when
    /// the whole invocation exceeds its deadline.
    #[instrument(
        skip(self, raw, requester),
        fields(resource_id = raw.resource_id.as_deref(), dry_run = raw.dry_run())
    )]
    pub async fn summarize(
        &self,
        raw: &SummaryRequest,
        requester: Option<&str>,
    ) -> RecapResult<Outcome> {
        match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.run(raw, requester))
                .await
                .map_err(|_| {
                    warn!(deadline_secs = deadline.as_secs(), "Invocation deadline exceeded");
                    RecapError::from(DeadlineError::new(deadline))
                })?,
            None => self.run(raw, requester).await,
        }
    }

    /// Run one invocation and shape the result as a response envelope.
    pub async fn handle(&self, raw: &SummaryRequest, requester: Option<&str>) -> SummaryResponse {
        match self.summarize(raw, requester).await {
            Ok(outcome) => outcome.into(),
            Err(e) => {
                if e.code().is_input_error() {
                    info!(code = %e.code(), "Request rejected: {}", e);
                } else {
                    warn!(code = %e.code(), "Invocation failed: {}", e);
                }
                SummaryResponse::from_error(&e)
            }
        }
    }

    /// The stored summary for a resource, checked against the requester.
    ///
    /// # Errors
    ///
    /// `MISSING_FIELD` without a requester, `NOT_FOUND` when the resource
    /// or its summary does not exist, `ACCESS_DENIED`, or `STORAGE_ERROR`.
    #[instrument(skip(self, requester))]
    pub async fn stored_summary(
        &self,
        resource_id: &str,
        requester: Option<&str>,
    ) -> RecapResult<PersistedSummary> {
        let requester = match requester {
            Some(requester) if !requester.trim().is_empty() => RequesterId::new(requester.trim()),
            _ => {
                return Err(RequestError::new(RequestErrorKind::MissingField(
                    "requesterIdentity".to_string(),
                ))
                .into());
            }
        };
        let resource_id = ResourceId::new(resource_id);

        self.validator.authorize(&resource_id, &requester).await?;
        self.store.get(&resource_id).await?.ok_or_else(|| {
            RequestError::new(RequestErrorKind::NotFound(resource_id.to_string())).into()
        })
    }

    async fn run(&self, raw: &SummaryRequest, requester: Option<&str>) -> RecapResult<Outcome> {
        let started = Instant::now();
        let mut tracker = StateTracker::new();

        let request = match self.validator.validate(raw, requester).await {
            Ok(request) => request,
            Err(e) => {
                tracker.advance(InvocationState::InputRejected);
                return Err(e);
            }
        };

        tracker.advance(InvocationState::Generating { attempt: 1 });
        let completion_request = self.prompt.request(
            request.content(),
            &self.model,
            self.temperature,
            self.max_tokens,
        );

        let accepted = match self
            .output_validator
            .generate(&self.client, &completion_request, &mut tracker)
            .await
        {
            Ok(accepted) => accepted,
            Err(e) => {
                self.audit_generation_failure(&request, &e);
                return Err(e);
            }
        };

        let processing_duration_ms =
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if *request.dry_run() {
            tracker.advance(InvocationState::DryRunComplete);
            self.audit.record(
                request.resource_id(),
                request.content(),
                AuditEventKind::DryRunCompleted,
            );
            return Ok(Outcome::DryRun(DryRunResult {
                processing_duration_ms,
                retry_attempts: accepted.completion.retries(),
                quality_attempts: accepted.quality_attempts,
                text: accepted.completion.response.text,
            }));
        }

        tracker.advance(InvocationState::Persisting);
        self.persist(&request, accepted, processing_duration_ms, &mut tracker)
            .await
    }

    async fn persist(
        &self,
        request: &GenerationRequest,
        accepted: AcceptedOutput,
        processing_duration_ms: u64,
        tracker: &mut StateTracker,
    ) -> RecapResult<Outcome> {
        let model_identifier = if accepted.completion.response.model.is_empty() {
            self.client.model_name().to_string()
        } else {
            accepted.completion.response.model.clone()
        };
        let retry_attempts = accepted.completion.retries();

        let summary = NewSummary::new(
            request.resource_id().clone(),
            accepted.text(),
            model_identifier,
            self.prompt.version(),
            processing_duration_ms,
            retry_attempts,
        );

        match self.writer.write(summary).await {
            Ok(summary) => {
                tracker.advance(InvocationState::Persisted);
                Ok(Outcome::Persisted(PersistedResult {
                    summary,
                    processing_duration_ms,
                    retry_attempts,
                    quality_attempts: accepted.quality_attempts,
                }))
            }
            Err(e) => {
                tracker.advance(InvocationState::PersistFailed);
                self.audit.record(
                    request.resource_id(),
                    request.content(),
                    AuditEventKind::PersistFailed {
                        generated_text: accepted.text().to_string(),
                        message: e.kind.to_string(),
                    },
                );
                Err(e.into())
            }
        }
    }

    fn audit_generation_failure(&self, request: &GenerationRequest, err: &RecapError) {
        let kind = match err.kind() {
            RecapErrorKind::Generation(e) => AuditEventKind::TransportFailed {
                error_code: e.kind.code(),
                attempts: e.attempts,
                budget_exhausted: e.budget_exhausted(),
            },
            RecapErrorKind::Validation(e) => AuditEventKind::ValidationExhausted {
                rejected_output: e.raw_output.clone(),
                attempts: e.attempts,
            },
            _ => return,
        };
        self.audit.record(request.resource_id(), request.content(), kind);
    }
}

/// Assembles a [`Summarizer`].
pub struct SummarizerBuilder {
    driver: Arc<dyn CompletionDriver>,
    directory: Arc<dyn ResourceDirectory>,
    store: Arc<dyn SummaryStore>,
    config: RecapConfig,
    sinks: Vec<Arc<dyn AuditSink>>,
    prompt: Option<PromptTemplate>,
}

impl SummarizerBuilder {
    /// Use these settings instead of the defaults.
    pub fn config(mut self, config: &RecapConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Add an audit sink. Without any, events go to [`TracingAuditSink`].
    pub fn audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Use a custom prompt template.
    pub fn prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Build the summarizer.
    pub fn build(self) -> Summarizer {
        let config = self.config;
        let prompt = self.prompt.unwrap_or_else(|| {
            PromptTemplate::with_version(config.pipeline.prompt_version.clone())
        });
        let sinks = if self.sinks.is_empty() {
            vec![Arc::new(TracingAuditSink) as Arc<dyn AuditSink>]
        } else {
            self.sinks
        };

        let client = CompletionClient::new(self.driver, BackoffPolicy::from(&config.retry))
            .with_requests_per_minute(config.completion.requests_per_minute);

        Summarizer {
            validator: RequestValidator::new(self.directory),
            client,
            output_validator: OutputValidator::from(&config.quality),
            writer: PersistenceWriter::new(self.store.clone()),
            store: self.store,
            audit: AuditLogger::new(sinks, config.pipeline.audit_sample_chars, prompt.version()),
            model: config.completion.model.clone(),
            temperature: config.completion.temperature,
            max_tokens: config.completion.max_tokens,
            deadline: config.pipeline.timeout(),
            prompt,
        }
    }
}
