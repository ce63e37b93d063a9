//! Wiring from configuration to a ready summarizer.

use crate::Backends;
use recap_core::{CompletionConfig, RecapConfig};
use recap_error::RecapResult;
use recap_interface::CompletionDriver;
use recap_models::{OpenAiCompatClient, OpenAiConfig};
use recap_pipeline::{Summarizer, TracingAuditSink};
use std::sync::Arc;
use tracing::{info, warn};

/// Build the HTTP completion driver described by `config`.
///
/// # Errors
///
/// Returns a configuration error if the HTTP client cannot be built.
pub fn driver_from_config(config: &CompletionConfig) -> RecapResult<Arc<dyn CompletionDriver>> {
    if config.api_key().is_none() {
        warn!(
            api_key_env = %config.api_key_env,
            "No API key set; completion calls will be unauthenticated"
        );
    }

    let client = OpenAiCompatClient::new(OpenAiConfig::from(config))?;
    info!(base_url = %config.base_url, model = %config.model, "Completion driver ready");
    Ok(Arc::new(client))
}

/// Assemble a summarizer over the given driver and backends.
///
/// Audit events go to the `recap::audit` tracing target.
pub fn build_summarizer(
    config: &RecapConfig,
    driver: Arc<dyn CompletionDriver>,
    backends: &Backends,
) -> Summarizer {
    Summarizer::builder(driver, backends.directory(), backends.store())
        .config(config)
        .audit_sink(Arc::new(TracingAuditSink))
        .build()
}
