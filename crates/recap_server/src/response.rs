//! HTTP rendering of pipeline results.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use recap_core::SummaryResponse;
use recap_error::RecapError;
use std::time::Duration;
use tracing::{error, info};

/// Summary envelope with its mapped HTTP status.
///
/// Failures carrying a suggested wait also get a `Retry-After` header in
/// whole seconds, rounded up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse(pub SummaryResponse);

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let retry_after = match &self.0 {
            SummaryResponse::Failure(body) => body.retry_after,
            SummaryResponse::Success(_) => None,
        };

        let mut response = (status, Json(self.0)).into_response();
        if let Some(wait) = retry_after {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after_secs(wait)));
        }
        response
    }
}

/// Error from a read endpoint, rendered as a failure envelope.
#[derive(Debug)]
pub struct ApiError(pub RecapError);

impl From<RecapError> for ApiError {
    fn from(err: RecapError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.code().is_input_error() {
            info!(code = %self.0.code(), "Request rejected: {}", self.0);
        } else {
            error!(code = %self.0.code(), "Request failed: {}", self.0);
        }
        ApiResponse(SummaryResponse::from_error(&self.0)).into_response()
    }
}

fn retry_after_secs(wait: Duration) -> u64 {
    wait.as_secs() + u64::from(wait.subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_after_rounds_up() {
        assert_eq!(retry_after_secs(Duration::from_secs(7)), 7);
        assert_eq!(retry_after_secs(Duration::from_millis(4_001)), 5);
        assert_eq!(retry_after_secs(Duration::from_millis(250)), 1);
        assert_eq!(retry_after_secs(Duration::ZERO), 0);
    }
}
