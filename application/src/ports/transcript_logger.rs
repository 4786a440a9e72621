//! Port for structured transcript logging.
//!
//! Defines the [`TranscriptLogger`] trait for recording debate events to a
//! machine-readable log (JSONL). This is separate from `tracing`-based
//! operation logs: tracing carries diagnostics, this port carries the
//! full debate record.

use super::event_bus::DebateEvent;

/// Port for logging debate events to a structured log.
///
/// The `log` method is synchronous and non-fallible so a logging problem
/// never disturbs a running debate; write failures are dropped.
pub trait TranscriptLogger: Send + Sync {
    fn log(&self, event: &DebateEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoTranscriptLogger;

impl TranscriptLogger for NoTranscriptLogger {
    fn log(&self, _event: &DebateEvent) {}
}
