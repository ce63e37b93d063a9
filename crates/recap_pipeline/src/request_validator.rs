//! Input and ownership checks.

use recap_core::{GenerationRequest, RequesterId, ResourceId, SummaryRequest};
use recap_error::{RecapResult, RequestError, RequestErrorKind};
use recap_interface::ResourceDirectory;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Turns a raw request into a [`GenerationRequest`] or an input error.
///
/// Field checks run first and make no external calls. Existence and
/// ownership are then checked as two separate steps, so a missing resource
/// is `NOT_FOUND` and someone else's resource is `ACCESS_DENIED`.
#[derive(Clone)]
pub struct RequestValidator {
    directory: Arc<dyn ResourceDirectory>,
}

impl std::fmt::Debug for RequestValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestValidator").finish_non_exhaustive()
    }
}

impl RequestValidator {
    /// Create a validator backed by a resource directory.
    pub fn new(directory: Arc<dyn ResourceDirectory>) -> Self {
        Self { directory }
    }

    /// Validate fields, then existence, then ownership.
    ///
    /// # Errors
    ///
    /// `MISSING_FIELD`, `NOT_FOUND`, `ACCESS_DENIED`, or `STORAGE_ERROR`
    /// when the directory itself fails.
    #[instrument(skip(self, raw), fields(resource_id = raw.resource_id.as_deref()))]
    pub async fn validate(
        &self,
        raw: &SummaryRequest,
        requester: Option<&str>,
    ) -> RecapResult<GenerationRequest> {
        let resource_id = required("resourceId", raw.resource_id.as_deref())?;
        let content = required("content", raw.content.as_deref())?;
        let requester = required("requesterIdentity", requester)?;

        let resource_id = ResourceId::new(resource_id.trim());
        let requester = RequesterId::new(requester.trim());
        self.authorize(&resource_id, &requester).await?;

        debug!("Request accepted");
        Ok(GenerationRequest::new(
            resource_id,
            content,
            raw.dry_run(),
            requester,
        ))
    }

    /// Check that `resource_id` exists and belongs to `requester`.
    ///
    /// # Errors
    ///
    /// `NOT_FOUND`, `ACCESS_DENIED`, or `STORAGE_ERROR`.
    #[instrument(skip(self), fields(resource_id = %resource_id, requester = %requester))]
    pub async fn authorize(
        &self,
        resource_id: &ResourceId,
        requester: &RequesterId,
    ) -> RecapResult<()> {
        match self.directory.owner_of(resource_id).await? {
            None => Err(RequestError::new(RequestErrorKind::NotFound(resource_id.to_string())).into()),
            Some(owner) if &owner != requester => Err(RequestError::new(
                RequestErrorKind::AccessDenied {
                    resource_id: resource_id.to_string(),
                    requester: requester.to_string(),
                },
            )
            .into()),
            Some(_) => Ok(()),
        }
    }
}

fn required<'a>(field: &str, value: Option<&'a str>) -> RecapResult<&'a str> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(RequestError::new(RequestErrorKind::MissingField(field.to_string())).into()),
    }
}
