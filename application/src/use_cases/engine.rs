//! Debate engine: concurrent sessions behind start/stop handles.
//!
//! Every session runs in its own tokio task and shares nothing with the
//! others except the event bus (events carry their session id).

use super::run_debate::{DebateController, StartError};
use crate::ports::event_bus::{DebateEvent, DebateEventBus};
use crate::ports::turn_invoker::TurnInvoker;
use debate_domain::{DebateConfig, SessionId, SessionResult, SessionStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

struct ActiveSession {
    token: CancellationToken,
    status: watch::Receiver<SessionStatus>,
}

type SessionTable = Arc<Mutex<HashMap<SessionId, ActiveSession>>>;

pub struct DebateEngine<I: TurnInvoker + ?Sized + 'static> {
    controller: Arc<DebateController<I>>,
    sessions: SessionTable,
}

impl<I: TurnInvoker + ?Sized + 'static> DebateEngine<I> {
    pub fn new(controller: DebateController<I>) -> Self {
        Self {
            controller: Arc::new(controller),
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn events(&self) -> &DebateEventBus {
        self.controller.events()
    }

    /// Validate and spawn a debate.
    ///
    /// Validation errors are returned synchronously and no session is
    /// created. Subscribe to [`events`](Self::events) before calling this
    /// to be sure to see the session's first events.
    pub fn start_debate(
        &self,
        question: impl Into<String>,
        config: DebateConfig,
    ) -> Result<SessionHandle, StartError> {
        let prepared = self.controller.prepare(question, config)?;
        let id = prepared.id();
        let token = CancellationToken::new();
        let status = prepared.status_receiver();

        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.insert(
                id,
                ActiveSession {
                    token: token.clone(),
                    status: status.clone(),
                },
            );
        }

        let sessions = Arc::clone(&self.sessions);
        let run_token = token.clone();
        let join = tokio::spawn(async move {
            let result = prepared.run(run_token).await;
            if let Ok(mut sessions) = sessions.lock() {
                sessions.remove(&id);
            }
            result
        });

        info!(session = %id, "Debate spawned");
        Ok(SessionHandle {
            id,
            token,
            status,
            events: self.controller.events().clone(),
            join,
        })
    }

    /// Request a cooperative stop.
    ///
    /// Unknown or already finished sessions are ignored. Returns whether
    /// a running session was signalled. During the round loop no further
    /// turn starts; during the summary the call in flight settles without
    /// retries and the session keeps the reason the loop ended with.
    pub fn stop_debate(&self, id: &SessionId) -> bool {
        let Ok(sessions) = self.sessions.lock() else {
            return false;
        };
        match sessions.get(id) {
            Some(active) if !active.status.borrow().is_terminal() => {
                debug!(session = %id, "Stop requested");
                active.token.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn active_sessions(&self) -> Vec<SessionId> {
        self.sessions
            .lock()
            .map(|sessions| sessions.keys().copied().collect())
            .unwrap_or_default()
    }
}

/// Handle to one spawned debate.
pub struct SessionHandle {
    id: SessionId,
    token: CancellationToken,
    status: watch::Receiver<SessionStatus>,
    events: DebateEventBus,
    join: JoinHandle<Arc<SessionResult>>,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Cooperative stop; calling it again or after the end is a no-op.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    /// Receiver of the shared bus; filter on [`DebateEvent::session_id`].
    pub fn subscribe(&self) -> broadcast::Receiver<DebateEvent> {
        self.events.subscribe()
    }

    /// Token that stops this session, e.g. for a signal handler
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Wait for the session to end.
    pub async fn wait(self) -> Result<Arc<SessionResult>, JoinError> {
        self.join.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::turn_invoker::{InvocationError, InvocationRequest, Utterance};
    use async_trait::async_trait;
    use debate_domain::{RoleSpec, Stance, TerminationReason, TokenUsage, ValidationError};
    use std::time::Duration;

    /// Replies after a fixed delay
    struct SlowInvoker(Duration);

    #[async_trait]
    impl TurnInvoker for SlowInvoker {
        async fn invoke(&self, request: &InvocationRequest) -> Result<Utterance, InvocationError> {
            tokio::time::sleep(self.0).await;
            Ok(Utterance {
                content: format!("{} speaks", request.role.id()),
                usage: TokenUsage::new(1, 1),
                latency_ms: 0,
            })
        }
    }

    fn engine(delay: Duration) -> DebateEngine<SlowInvoker> {
        DebateEngine::new(DebateController::new(Arc::new(SlowInvoker(delay))))
    }

    fn config(rounds: u32) -> DebateConfig {
        DebateConfig::new(vec![
            RoleSpec::new(Stance::Pro, "for"),
            RoleSpec::new(Stance::Con, "against"),
        ])
        .with_max_rounds(rounds)
        .with_timeout_minutes(60)
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_and_wait() {
        let engine = engine(Duration::from_secs(1));
        let handle = engine.start_debate("Q?", config(2)).unwrap();
        assert!(engine.active_sessions().contains(&handle.id()));

        let id = handle.id();
        let result = handle.wait().await.unwrap();
        assert_eq!(result.session_id, id);
        assert_eq!(result.termination_reason, TerminationReason::RoundLimit);
        assert_eq!(result.transcript.len(), 4);
        assert!(engine.active_sessions().is_empty());
    }

    #[tokio::test]
    async fn test_validation_error_spawns_nothing() {
        let engine = engine(Duration::ZERO);
        let err = engine
            .start_debate("Q?", config(0))
            .err()
            .unwrap();
        assert_eq!(err, StartError::Validation(ValidationError::InvalidMaxRounds(0)));
        assert!(engine.active_sessions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_debate_cancels_running_session() {
        let engine = engine(Duration::from_secs(10));
        let handle = engine.start_debate("Q?", config(50)).unwrap();
        let id = handle.id();

        // Let the first turn get under way
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(handle.status(), SessionStatus::Running);
        assert!(engine.stop_debate(&id));

        let result = handle.wait().await.unwrap();
        assert_eq!(result.termination_reason, TerminationReason::Cancelled);
        // The in-flight turn completes; nothing after it
        assert_eq!(result.transcript.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent_after_termination() {
        let engine = engine(Duration::from_millis(10));
        let handle = engine.start_debate("Q?", config(1)).unwrap();
        let id = handle.id();
        let token = handle.cancellation_token();
        let result = handle.wait().await.unwrap();
        assert_eq!(result.status, SessionStatus::Completed);

        assert!(!engine.stop_debate(&id));
        assert!(!engine.stop_debate(&id));
        assert!(!engine.stop_debate(&SessionId::new()));
        token.cancel();
        token.cancel();
        assert_eq!(result.status, SessionStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_stop_twice() {
        let engine = engine(Duration::from_secs(1));
        let handle = engine.start_debate("Q?", config(10)).unwrap();
        handle.stop();
        handle.stop();
        let result = handle.wait().await.unwrap();
        assert_eq!(result.status, SessionStatus::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sessions_are_isolated() {
        let engine = engine(Duration::from_secs(1));
        let mut events = engine.events().subscribe();
        let a = engine.start_debate("First?", config(1)).unwrap();
        let b = engine.start_debate("Second?", config(2)).unwrap();
        let (a_id, b_id) = (a.id(), b.id());
        assert_ne!(a_id, b_id);

        let (ra, rb) = tokio::join!(a.wait(), b.wait());
        let (ra, rb) = (ra.unwrap(), rb.unwrap());
        assert_eq!(ra.transcript.len(), 2);
        assert_eq!(rb.transcript.len(), 4);
        assert_eq!(ra.question.content(), "First?");

        let mut terminated = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let DebateEvent::SessionTerminated { session_id, .. } = event {
                terminated.push(session_id);
            }
        }
        assert_eq!(terminated.len(), 2);
        assert!(terminated.contains(&a_id) && terminated.contains(&b_id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_during_summary_keeps_loop_outcome() {
        let engine = engine(Duration::from_secs(1));
        let config = DebateConfig::new(vec![
            RoleSpec::new(Stance::Pro, "for"),
            RoleSpec::new(Stance::Con, "against"),
            RoleSpec::new(Stance::Summary, "sum up").with_id("sum"),
        ])
        .with_max_rounds(1)
        .with_timeout_minutes(60)
        .with_summary(true);
        let handle = engine.start_debate("Q?", config).unwrap();
        let id = handle.id();

        // Two turns take two seconds; the summary call is then in flight
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(handle.status(), SessionStatus::Running);
        assert!(engine.stop_debate(&id));

        let result = handle.wait().await.unwrap();
        assert_eq!(result.termination_reason, TerminationReason::RoundLimit);
        assert_eq!(result.status, SessionStatus::Completed);
        assert_eq!(result.summary_text.as_deref(), Some("sum speaks"));
    }
}
