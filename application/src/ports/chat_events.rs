//! Port for structured chat event logging.
//!
//! Defines the [`ChatEventSink`] trait for recording orchestration events
//! (turns, selection fallbacks, retries, termination, sprint phases) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the run in
//! a machine-readable format (JSONL).

use serde_json::Value;

/// A structured orchestration event for logging.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields.
pub struct ChatEvent {
    /// Event type identifier (e.g., "turn_completed", "selection_fallback").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ChatEvent {
    /// Create a new chat event.
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging orchestration events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL
/// line). The `log` method is intentionally synchronous and non-fallible
/// to avoid disrupting the main execution flow; logging failures are
/// silently ignored.
pub trait ChatEventSink: Send + Sync {
    /// Record a chat event.
    fn log(&self, event: ChatEvent);
}

/// No-op implementation for tests and when event logging is disabled.
pub struct NoChatEvents;

impl ChatEventSink for NoChatEvents {
    fn log(&self, _event: ChatEvent) {}
}
