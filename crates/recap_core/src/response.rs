//! Invocation response envelope.

use recap_error::{ErrorCode, RecapError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Body of a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessBody {
    /// Always `true`
    pub success: bool,
    /// Accepted summary text
    pub text: String,
    /// Whether persistence was skipped
    pub dry_run: bool,
    /// Wall time of the invocation
    pub processing_duration_ms: u64,
    /// Transport retries spent on the accepted completion
    pub retry_attempts: u32,
    /// Generations judged by the quality gate
    pub quality_attempts: u32,
    /// Row id of the stored summary, absent for dry runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persisted_id: Option<String>,
}

/// Body of a failed invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureBody {
    /// Always `false`
    pub success: bool,
    /// Structured failure code
    pub error_code: ErrorCode,
    /// Message safe to show the caller
    pub message: String,
    /// Last rejected generation, only for `VALIDATION_FAILED`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
    /// Suggested wait before retrying, sent as a header rather than in the body
    #[serde(skip)]
    pub retry_after: Option<Duration>,
}

/// Response to one summary invocation.
///
/// # Examples
///
/// ```
/// use recap_core::SummaryResponse;
/// use recap_error::{RecapError, RequestError, RequestErrorKind};
///
/// let err: RecapError =
///     RequestError::new(RequestErrorKind::MissingField("content".to_string())).into();
/// let response = SummaryResponse::from_error(&err);
///
/// let json = serde_json::to_value(&response).unwrap();
/// assert_eq!(json["success"], false);
/// assert_eq!(json["errorCode"], "MISSING_FIELD");
/// assert!(json.get("rawOutput").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::From)]
#[serde(untagged)]
pub enum SummaryResponse {
    /// Accepted and, unless a dry run, stored
    Success(SuccessBody),
    /// Terminated with a classified failure
    Failure(FailureBody),
}

impl SummaryResponse {
    /// Build a success response.
    pub fn success(
        text: impl Into<String>,
        dry_run: bool,
        processing_duration_ms: u64,
        retry_attempts: u32,
        quality_attempts: u32,
        persisted_id: Option<String>,
    ) -> Self {
        Self::Success(SuccessBody {
            success: true,
            text: text.into(),
            dry_run,
            processing_duration_ms,
            retry_attempts,
            quality_attempts,
            persisted_id,
        })
    }

    /// Build a failure response from a classified error.
    pub fn from_error(err: &RecapError) -> Self {
        Self::Failure(FailureBody {
            success: false,
            error_code: err.code(),
            message: err.public_message(),
            raw_output: err.raw_output().map(str::to_string),
            retry_after: err.retry_after(),
        })
    }

    /// True for the success variant.
    pub fn is_success(&self) -> bool {
        matches!(self, SummaryResponse::Success(_))
    }

    /// Failure code, if this is a failure.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            SummaryResponse::Success(_) => None,
            SummaryResponse::Failure(body) => Some(body.error_code),
        }
    }

    /// HTTP status for this response.
    pub fn http_status(&self) -> u16 {
        match self {
            SummaryResponse::Success(_) => 200,
            SummaryResponse::Failure(body) => body.error_code.http_status(),
        }
    }
}
