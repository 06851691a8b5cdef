//! Port for structured engine event logging.
//!
//! Defines the [`EventLogger`] trait for recording what the engine did
//! (suggestions served, votes recorded, prompts rewritten) as machine-readable
//! records, separate from the human-oriented `tracing` output.

use serde_json::Value;

/// A structured engine event.
///
/// The adapter stamps the timestamp when it writes the record.
pub struct EngineEvent {
    /// Event type identifier (e.g., "suggestion_generated", "prompt_rewritten").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl EngineEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging engine events.
///
/// `log` is synchronous and infallible: a broken log sink never fails a
/// suggestion or a vote.
pub trait EventLogger: Send + Sync {
    fn log(&self, event: EngineEvent);
}

/// No-op implementation for tests and when event logging is disabled.
pub struct NoEventLogger;

impl EventLogger for NoEventLogger {
    fn log(&self, _event: EngineEvent) {}
}
