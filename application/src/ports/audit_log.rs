//! Port for structured lifecycle auditing.
//!
//! Defines the [`AuditLog`] trait for recording lifecycle events (votes
//! opened, tallies refreshed, resolutions published or withdrawn) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the
//! governance record in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured audit event.
pub struct AuditEvent {
    /// Event type identifier (e.g. "vote_opened", "resolution_published").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for recording audit events.
///
/// The `record` method is intentionally synchronous and non-fallible so a
/// broken log never disrupts the lifecycle — failures are silently ignored
/// by implementations.
pub trait AuditLog: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLog;

impl AuditLog for NoAuditLog {
    fn record(&self, _event: AuditEvent) {}
}
