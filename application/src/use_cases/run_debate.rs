//! Run Debate use case
//!
//! The [`DebateController`] validates a debate and drives its state
//! machine:
//!
//! ```text
//! prepare ──validate──▶ PreparedDebate (idle)
//!                          │ run
//!                          ▼
//!                       running ── round loop ──▶ summarize? ──▶ completed | cancelled | failed
//! ```
//!
//! Each round the scheduler orders the turns, every turn goes through the
//! [`TurnInvoker`] (with retries) and is appended to the transcript, then
//! the termination evaluator decides whether another round starts.
//! Cancellation is cooperative and observed only between turns.

use super::shared::{check_cancelled, invoke_with_retry};
use super::summarize::Summarizer;
use crate::config::InvocationParams;
use crate::ports::event_bus::{DebateEvent, DebateEventBus};
use crate::ports::transcript_logger::{NoTranscriptLogger, TranscriptLogger};
use crate::ports::turn_invoker::{InvocationRequest, TurnInvoker};
use chrono::Utc;
use debate_domain::{
    ConsensusStrategy, ContinueDecision, DebateConfig, DebateSession, NeverConsensus, Question,
    RoleRegistry, Round, RoundOutcome, ScheduledTurn, SessionId, SessionResult, SessionStatus,
    TerminationEvaluator, TerminationReason, TokenUsage, Transcript, Turn, TurnKind,
    TurnScheduler, ValidationError,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

/// Errors that prevent a debate from starting.
///
/// When one of these is returned no session exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Use case for running debates
pub struct DebateController<I: TurnInvoker + ?Sized> {
    invoker: Arc<I>,
    consensus: Arc<dyn ConsensusStrategy>,
    params: InvocationParams,
    events: DebateEventBus,
    logger: Arc<dyn TranscriptLogger>,
}

impl<I: TurnInvoker + ?Sized> DebateController<I> {
    pub fn new(invoker: Arc<I>) -> Self {
        Self {
            invoker,
            consensus: Arc::new(NeverConsensus),
            params: InvocationParams::default(),
            events: DebateEventBus::new(),
            logger: Arc::new(NoTranscriptLogger),
        }
    }

    pub fn with_consensus(mut self, strategy: Arc<dyn ConsensusStrategy>) -> Self {
        self.consensus = strategy;
        self
    }

    pub fn with_params(mut self, params: InvocationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_event_bus(mut self, events: DebateEventBus) -> Self {
        self.events = events;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn TranscriptLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Bus every session of this controller publishes to
    pub fn events(&self) -> &DebateEventBus {
        &self.events
    }

    pub fn params(&self) -> &InvocationParams {
        &self.params
    }

    /// Validate `question` and `config` and set up an idle session.
    pub fn prepare(
        &self,
        question: impl Into<String>,
        config: DebateConfig,
    ) -> Result<PreparedDebate<I>, StartError> {
        let question = Question::new(question)?;
        let registry = config.validate()?;
        for issue in registry.issues() {
            warn!("Config: {}", issue.message);
        }

        let evaluator = TerminationEvaluator::from_config(&config);
        let scheduler = TurnScheduler::new(&registry);
        let session = DebateSession::new(question, config);
        let (status, _) = watch::channel(session.status());

        Ok(PreparedDebate {
            session,
            registry,
            scheduler,
            evaluator,
            invoker: Arc::clone(&self.invoker),
            consensus: Arc::clone(&self.consensus),
            params: self.params.clone(),
            events: self.events.clone(),
            logger: Arc::clone(&self.logger),
            status,
        })
    }

    /// Validate and run a debate to its end in the current task.
    pub async fn run(
        &self,
        question: impl Into<String>,
        config: DebateConfig,
        token: CancellationToken,
    ) -> Result<Arc<SessionResult>, StartError> {
        Ok(self.prepare(question, config)?.run(token).await)
    }
}

/// A validated debate that has not started yet.
pub struct PreparedDebate<I: TurnInvoker + ?Sized> {
    session: DebateSession,
    registry: RoleRegistry,
    scheduler: TurnScheduler,
    evaluator: TerminationEvaluator,
    invoker: Arc<I>,
    consensus: Arc<dyn ConsensusStrategy>,
    params: InvocationParams,
    events: DebateEventBus,
    logger: Arc<dyn TranscriptLogger>,
    status: watch::Sender<SessionStatus>,
}

/// How the round loop ended
struct LoopExit {
    reason: TerminationReason,
    rounds_completed: u32,
    error: Option<String>,
}

impl LoopExit {
    fn stopped(reason: TerminationReason, rounds_completed: u32) -> Self {
        Self {
            reason,
            rounds_completed,
            error: None,
        }
    }

    fn failed(rounds_completed: u32, error: String) -> Self {
        Self {
            reason: TerminationReason::Failed,
            rounds_completed,
            error: Some(error),
        }
    }
}

impl<I: TurnInvoker + ?Sized> PreparedDebate<I> {
    pub fn id(&self) -> SessionId {
        self.session.id()
    }

    pub fn session(&self) -> &DebateSession {
        &self.session
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// Observe status changes without touching the transcript
    pub fn status_receiver(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Drive the debate to a terminal status.
    ///
    /// Always produces a result; invocation problems end up in the
    /// transcript, the warnings or the `failed` status, never as an error.
    pub async fn run(self, token: CancellationToken) -> Arc<SessionResult> {
        let span = info_span!("debate", session = %self.session.id().short());
        self.run_inner(token).instrument(span).await
    }

    async fn run_inner(mut self, token: CancellationToken) -> Arc<SessionResult> {
        let session_id = self.session.id();
        let question = self.session.question().clone();

        self.set_status(SessionStatus::Running);
        info!(
            debaters = self.registry.debaters().len(),
            moderator = self.registry.moderator().is_some(),
            max_rounds = self.evaluator.max_rounds(),
            turns_per_round = self.scheduler.turns_per_round(),
            "Debate started"
        );
        self.emit(DebateEvent::SessionStarted {
            session_id,
            question: question.content().to_string(),
        });

        let clock = Instant::now();
        let mut transcript = Transcript::new();
        let exit = self.drive(&mut transcript, clock, &token).await;

        let mut warnings: Vec<String> = self
            .registry
            .issues()
            .iter()
            .map(|issue| issue.message.clone())
            .collect();
        warnings.extend(transcript.turns().iter().filter(|t| !t.is_ok()).map(|t| {
            format!(
                "{} failed in round {}: {}",
                t.role_id,
                t.round_index + 1,
                t.error.as_deref().unwrap_or("unknown error")
            )
        }));

        let (summary_text, summary_usage) = self
            .summarize(&exit, &question, &transcript, &token, &mut warnings)
            .await;

        let status = match exit.reason {
            TerminationReason::Cancelled => SessionStatus::Cancelled,
            TerminationReason::Failed => SessionStatus::Failed,
            _ => SessionStatus::Completed,
        };
        self.set_status(status);

        info!(
            reason = %exit.reason,
            rounds = exit.rounds_completed,
            turns = transcript.len(),
            tokens = transcript.total_tokens(),
            "Debate ended"
        );

        let result = Arc::new(SessionResult {
            session_id,
            question,
            status,
            termination_reason: exit.reason,
            total_tokens: transcript.total_tokens(),
            transcript,
            roles: self.registry.roles().cloned().collect(),
            rounds_completed: exit.rounds_completed,
            summary_text,
            summary_usage,
            warnings,
            error: exit.error,
            started_at: self
                .session
                .started_at()
                .unwrap_or_else(|| self.session.created_at()),
            finished_at: self.session.finished_at().unwrap_or_else(Utc::now),
        });

        self.emit(DebateEvent::SessionTerminated {
            session_id,
            result: Arc::clone(&result),
        });
        result
    }

    /// The round loop
    async fn drive(
        &self,
        transcript: &mut Transcript,
        clock: Instant,
        token: &CancellationToken,
    ) -> LoopExit {
        let session_id = self.session.id();
        let mut rounds_completed = 0;

        loop {
            let round_index = rounds_completed;
            let plan = self.scheduler.plan(round_index);
            debug!(round = round_index + 1, turns = plan.len(), "Round started");

            for scheduled in &plan.turns {
                if check_cancelled(token).is_err() {
                    info!(round = round_index + 1, "Cancellation observed");
                    return LoopExit::stopped(TerminationReason::Cancelled, rounds_completed);
                }

                let turn = self.execute_turn(scheduled, round_index, transcript, token).await;
                let failure = turn.error.clone();
                if let Err(e) = transcript.append(turn.clone()) {
                    warn!(error = %e, "Transcript rejected turn");
                    return LoopExit::failed(rounds_completed, e.to_string());
                }
                self.emit(DebateEvent::TurnCompleted { session_id, turn });

                // A stop wins over escalation; the next check reports it
                if let Some(error) = failure
                    && !token.is_cancelled()
                    && transcript.consecutive_failures() >= self.params.failure_threshold
                {
                    warn!(
                        failures = transcript.consecutive_failures(),
                        error = %error,
                        "Too many consecutive failed turns"
                    );
                    return LoopExit::failed(rounds_completed, error);
                }
            }

            rounds_completed += 1;
            let consensus = self.evaluator.checks_consensus()
                && self
                    .consensus
                    .assess(self.session.question(), transcript, round_index);
            let outcome = RoundOutcome {
                rounds_completed,
                elapsed: clock.elapsed(),
                consensus,
                round_tokens: transcript.tokens_for_round(round_index),
            };
            let decision = self.evaluator.evaluate(&outcome);
            debug!(
                round = round_index + 1,
                tokens = outcome.round_tokens,
                elapsed_secs = outcome.elapsed.as_secs(),
                consensus,
                ?decision,
                "Round completed"
            );

            let round = transcript.round(round_index).unwrap_or(Round {
                index: round_index,
                turns: Vec::new(),
            });
            self.emit(DebateEvent::RoundCompleted {
                session_id,
                round,
                decision,
            });

            if let ContinueDecision::Stop(reason) = decision {
                return LoopExit::stopped(reason, rounds_completed);
            }
        }
    }

    async fn execute_turn(
        &self,
        scheduled: &ScheduledTurn,
        round_index: u32,
        transcript: &Transcript,
        token: &CancellationToken,
    ) -> Turn {
        let session_id = self.session.id();
        let role = &scheduled.role;
        self.emit(DebateEvent::TurnStarted {
            session_id,
            round_index,
            role_id: role.id().clone(),
            kind: scheduled.kind,
        });

        // The moderator always sees the whole current round
        let keep_round = (scheduled.kind == TurnKind::Moderation).then_some(round_index);
        let request = InvocationRequest {
            role: role.clone(),
            kind: scheduled.kind,
            round_index,
            question: self.session.question().clone(),
            context: transcript.window(self.params.context_window, keep_round),
        };

        let started = Instant::now();
        let result = invoke_with_retry(self.invoker.as_ref(), &request, &self.params, token, |attempt, err| {
            warn!(role = %role.id(), attempt, error = %err, "Retrying turn");
            self.emit(DebateEvent::TurnRetrying {
                session_id,
                round_index,
                role_id: role.id().clone(),
                attempt,
                error: err.to_string(),
            });
        })
        .await;

        match result {
            Ok(utterance) => {
                debug!(
                    role = %role.id(),
                    tokens = utterance.usage.total(),
                    latency_ms = utterance.latency_ms,
                    "Turn completed"
                );
                Turn::ok(
                    role.id().clone(),
                    round_index,
                    scheduled.kind,
                    utterance.content,
                    utterance.usage,
                    utterance.latency_ms,
                )
            }
            Err(e) => {
                warn!(role = %role.id(), error = %e, "Turn failed");
                let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                Turn::failed(role.id().clone(), round_index, scheduled.kind, e.to_string(), latency_ms)
            }
        }
    }

    async fn summarize(
        &self,
        exit: &LoopExit,
        question: &Question,
        transcript: &Transcript,
        token: &CancellationToken,
        warnings: &mut Vec<String>,
    ) -> (Option<String>, Option<TokenUsage>) {
        let Some(role) = self.registry.summarizer() else {
            return (None, None);
        };
        let skip = match exit.reason {
            TerminationReason::Failed => true,
            TerminationReason::Cancelled => !self.params.summarize_on_cancel,
            _ => false,
        };
        if skip {
            debug!(reason = %exit.reason, "Skipping summary");
            return (None, None);
        }

        self.emit(DebateEvent::TurnStarted {
            session_id: self.session.id(),
            round_index: exit.rounds_completed,
            role_id: role.id().clone(),
            kind: TurnKind::Summary,
        });
        match Summarizer::new(self.invoker.as_ref(), &self.params)
            .summarize(role, question, transcript, token)
            .await
        {
            Ok(utterance) => (Some(utterance.content), Some(utterance.usage)),
            Err(e) => {
                warn!(error = %e, "Summary failed");
                warnings.push(format!("Summary failed: {}", e));
                (None, None)
            }
        }
    }

    fn set_status(&mut self, to: SessionStatus) {
        if let Err(e) = self.session.transition(to) {
            warn!(error = %e, "Ignoring status change");
            return;
        }
        self.status.send_replace(to);
    }

    fn emit(&self, event: DebateEvent) {
        self.logger.log(&event);
        self.events.publish(event);
    }
}
