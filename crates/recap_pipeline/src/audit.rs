//! Audit logger and built-in sinks.

use parking_lot::Mutex;
use recap_core::{AuditEvent, AuditEventKind, ResourceId};
use recap_interface::AuditSink;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Fans audit events out to sinks without ever failing the caller.
///
/// A sink that panics is isolated; the panic is caught, reported once at
/// `error` level, and the remaining sinks still receive the event.
#[derive(Clone)]
pub struct AuditLogger {
    sinks: Vec<Arc<dyn AuditSink>>,
    sample_chars: usize,
    prompt_version: String,
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger")
            .field("sinks", &self.sinks.len())
            .field("sample_chars", &self.sample_chars)
            .field("prompt_version", &self.prompt_version)
            .finish()
    }
}

impl AuditLogger {
    /// Create a logger with the given sinks.
    pub fn new(
        sinks: Vec<Arc<dyn AuditSink>>,
        sample_chars: usize,
        prompt_version: impl Into<String>,
    ) -> Self {
        Self {
            sinks,
            sample_chars,
            prompt_version: prompt_version.into(),
        }
    }

    /// Build and record an event for `resource_id`.
    pub fn record(&self, resource_id: &ResourceId, content: &str, kind: AuditEventKind) {
        let event = AuditEvent::new(
            resource_id.clone(),
            content,
            self.sample_chars,
            self.prompt_version.clone(),
            kind,
        );
        self.emit(&event);
    }

    /// Deliver a prepared event to every sink.
    pub fn emit(&self, event: &AuditEvent) {
        for sink in &self.sinks {
            if catch_unwind(AssertUnwindSafe(|| sink.record(event))).is_err() {
                error!(
                    event = event.kind.label(),
                    resource_id = %event.resource_id,
                    "Audit sink panicked; event dropped for that sink"
                );
            }
        }
    }
}

/// Writes audit events as structured `tracing` events on target `recap::audit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) {
        match &event.kind {
            AuditEventKind::DryRunCompleted => info!(
                target: "recap::audit",
                event = event.kind.label(),
                resource_id = %event.resource_id,
                prompt_version = %event.prompt_version,
                input_sample = %event.input_sample,
                "Dry run completed"
            ),
            AuditEventKind::ValidationExhausted {
                rejected_output,
                attempts,
            } => warn!(
                target: "recap::audit",
                event = event.kind.label(),
                resource_id = %event.resource_id,
                prompt_version = %event.prompt_version,
                input_sample = %event.input_sample,
                attempts,
                rejected_output = %rejected_output,
                "Quality budget exhausted"
            ),
            AuditEventKind::TransportFailed {
                error_code,
                attempts,
                budget_exhausted,
            } => warn!(
                target: "recap::audit",
                event = event.kind.label(),
                resource_id = %event.resource_id,
                prompt_version = %event.prompt_version,
                input_sample = %event.input_sample,
                error_code = %error_code,
                attempts,
                budget_exhausted,
                "Completion failed"
            ),
            AuditEventKind::PersistFailed {
                generated_text,
                message,
            } => error!(
                target: "recap::audit",
                event = event.kind.label(),
                resource_id = %event.resource_id,
                prompt_version = %event.prompt_version,
                input_sample = %event.input_sample,
                generated_text = %generated_text,
                message = %message,
                "Summary generated but not stored"
            ),
        }
    }
}

/// Keeps every event in memory for later inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MemoryAuditSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }

    /// Number of events recorded.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &AuditEvent) {
        self.events.lock().push(event.clone());
    }
}
