//! Port for structured activity logging.
//!
//! Defines the [`EventLog`] trait for recording shortlist and voting events
//! (session opened/closed, votes cast and retracted, records resolved) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the
//! activity stream in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured activity event for logging.
pub struct ActivityEvent {
    /// Event type identifier (e.g., "vote_cast", "session_closed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ActivityEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging activity events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL
/// line). The `log` method is intentionally synchronous and non-fallible to
/// avoid disrupting the main execution flow — logging failures are silently
/// ignored.
pub trait EventLog: Send + Sync {
    /// Record an activity event.
    fn log(&self, event: ActivityEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoEventLog;

impl EventLog for NoEventLog {
    fn log(&self, _event: ActivityEvent) {}
}
