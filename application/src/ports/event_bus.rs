//! Debate events and the broadcast bus that carries them.
//!
//! The engine only emits structured [`DebateEvent`]s; rendering them is
//! up to subscribers (the console progress reporter, the JSONL logger).
//! Payloads are owned copies, so subscribers never borrow the
//! controller's transcript.

use debate_domain::{
    ContinueDecision, RoleId, Round, SessionId, SessionResult, Turn, TurnKind,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

/// Channel capacity for broadcast
pub const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DebateEvent {
    SessionStarted {
        session_id: SessionId,
        question: String,
    },
    TurnStarted {
        session_id: SessionId,
        round_index: u32,
        role_id: RoleId,
        kind: TurnKind,
    },
    TurnRetrying {
        session_id: SessionId,
        round_index: u32,
        role_id: RoleId,
        attempt: u32,
        error: String,
    },
    TurnCompleted {
        session_id: SessionId,
        turn: Turn,
    },
    RoundCompleted {
        session_id: SessionId,
        round: Round,
        decision: ContinueDecision,
    },
    SessionTerminated {
        session_id: SessionId,
        result: Arc<SessionResult>,
    },
}

impl DebateEvent {
    pub fn session_id(&self) -> SessionId {
        match self {
            DebateEvent::SessionStarted { session_id, .. }
            | DebateEvent::TurnStarted { session_id, .. }
            | DebateEvent::TurnRetrying { session_id, .. }
            | DebateEvent::TurnCompleted { session_id, .. }
            | DebateEvent::RoundCompleted { session_id, .. }
            | DebateEvent::SessionTerminated { session_id, .. } => *session_id,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            DebateEvent::SessionStarted { .. } => "session_started",
            DebateEvent::TurnStarted { .. } => "turn_started",
            DebateEvent::TurnRetrying { .. } => "turn_retrying",
            DebateEvent::TurnCompleted { .. } => "turn_completed",
            DebateEvent::RoundCompleted { .. } => "round_completed",
            DebateEvent::SessionTerminated { .. } => "session_terminated",
        }
    }
}

/// Publish/subscribe bus for [`DebateEvent`]s.
///
/// Cloning shares the underlying channel. Subscribers only see events
/// published after they subscribed; a subscriber that falls more than
/// [`CHANNEL_CAPACITY`] events behind gets `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct DebateEventBus {
    sender: broadcast::Sender<DebateEvent>,
}

impl DebateEventBus {
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: DebateEvent) {
        let event_type = event.event_type();
        // No receivers is OK
        match self.sender.send(event) {
            Ok(count) => trace!(event_type, receivers = count, "Event published"),
            Err(_) => trace!(event_type, "Event published (no receivers)"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DebateEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for DebateEventBus {
    fn default() -> Self {
        Self::new()
    }
}
