//! Routes and handlers.

use crate::{ApiError, ApiResponse};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, HeaderName, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use recap_core::SummaryRequest;
use recap_error::{ConfigError, RecapResult};
use recap_pipeline::Summarizer;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, instrument};

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct ApiState {
    summarizer: Arc<Summarizer>,
    identity_header: HeaderName,
}

impl ApiState {
    /// Creates API state reading the requester from `identity_header`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the header name is not a valid
    /// HTTP header name.
    pub fn new(summarizer: Arc<Summarizer>, identity_header: &str) -> RecapResult<Self> {
        let identity_header = HeaderName::try_from(identity_header.to_ascii_lowercase())
            .map_err(|e| {
                ConfigError::new(format!(
                    "Invalid identity header '{}': {}",
                    identity_header, e
                ))
            })?;
        Ok(Self {
            summarizer,
            identity_header,
        })
    }

    fn requester<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get(&self.identity_header)
            .and_then(|value| value.to_str().ok())
    }
}

/// Creates the summary API router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/summaries", post(create_summary))
        .route("/v1/summaries/:resource_id", get(get_summary))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// Run one summary invocation.
///
/// A body that is not a JSON object is treated as an empty request, so the
/// caller gets the same `MISSING_FIELD` answer as for absent fields.
#[instrument(skip_all)]
async fn create_summary(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResponse {
    let request = serde_json::from_slice::<SummaryRequest>(&body).unwrap_or_else(|e| {
        debug!("Unreadable request body: {}", e);
        SummaryRequest::default()
    });

    let response = state
        .summarizer
        .handle(&request, state.requester(&headers))
        .await;
    ApiResponse(response)
}

/// Fetch the stored summary for a resource.
#[instrument(skip(state, headers))]
async fn get_summary(
    State(state): State<ApiState>,
    Path(resource_id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .summarizer
        .stored_summary(&resource_id, state.requester(&headers))
        .await?;
    Ok((StatusCode::OK, Json(summary)))
}
