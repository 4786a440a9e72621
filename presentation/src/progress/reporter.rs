//! Progress reporting for debate execution

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use debate_application::DebateEvent;
use debate_domain::{
    ContinueDecision, Role, RoleId, Round, SessionId, SessionResult, Turn, TurnKind,
};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};

/// Callbacks for the events of one debate session
pub trait ProgressNotifier: Send + Sync {
    fn on_turn_started(&self, round_index: u32, role_id: &RoleId, kind: TurnKind);

    fn on_turn_retrying(&self, role_id: &RoleId, attempt: u32, error: &str);

    fn on_turn_completed(&self, turn: &Turn);

    fn on_round_completed(&self, round: &Round, decision: &ContinueDecision);

    fn on_session_terminated(&self, _result: &SessionResult) {}
}

/// Feed one session's events to `notifier` until it terminates.
///
/// Events of other sessions are skipped. If the receiver lags, the
/// missed events are dropped and following continues.
pub async fn follow(
    notifier: &dyn ProgressNotifier,
    mut events: broadcast::Receiver<DebateEvent>,
    session_id: SessionId,
) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => return,
        };
        if event.session_id() != session_id {
            continue;
        }
        match &event {
            DebateEvent::SessionStarted { .. } => {}
            DebateEvent::TurnStarted {
                round_index,
                role_id,
                kind,
                ..
            } => notifier.on_turn_started(*round_index, role_id, *kind),
            DebateEvent::TurnRetrying {
                role_id,
                attempt,
                error,
                ..
            } => notifier.on_turn_retrying(role_id, *attempt, error),
            DebateEvent::TurnCompleted { turn, .. } => notifier.on_turn_completed(turn),
            DebateEvent::RoundCompleted {
                round, decision, ..
            } => notifier.on_round_completed(round, decision),
            DebateEvent::SessionTerminated { result, .. } => {
                notifier.on_session_terminated(result);
                return;
            }
        }
    }
}

fn round_line(round: &Round, decision: &ContinueDecision) -> String {
    let head = format!("Round {} complete", round.index + 1);
    let failed = match round.failed_turns() {
        0 => String::new(),
        n => format!(", {} failed", n),
    };
    match decision {
        ContinueDecision::Continue => {
            format!("{} {} ({} tokens{})", "->".cyan(), head.bold(), round.tokens(), failed)
        }
        ContinueDecision::Stop(reason) => format!(
            "{} {} ({} tokens{}), stopping: {}",
            "->".cyan(),
            head.bold(),
            round.tokens(),
            failed,
            reason.description()
        ),
    }
}

/// Reports progress with a spinner per turn
pub struct ProgressReporter {
    multi: MultiProgress,
    roles: HashMap<RoleId, Role>,
    turn_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new<'a>(roles: impl IntoIterator<Item = &'a Role>) -> Self {
        Self {
            multi: MultiProgress::new(),
            roles: roles
                .into_iter()
                .map(|role| (role.id().clone(), role.clone()))
                .collect(),
            turn_bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn label(&self, role_id: &RoleId) -> String {
        match self.roles.get(role_id) {
            Some(role) => ConsoleFormatter::role_label(role.name(), role.color()).to_string(),
            None => role_id.to_string().bold().to_string(),
        }
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.turn_bar.lock().ok().and_then(|mut bar| bar.take())
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_turn_started(&self, round_index: u32, role_id: &RoleId, kind: TurnKind) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(self.label(role_id));
        pb.set_message(format!("round {} · {}", round_index + 1, kind).dimmed().to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut bar) = self.turn_bar.lock()
            && let Some(previous) = bar.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_turn_retrying(&self, _role_id: &RoleId, attempt: u32, error: &str) {
        if let Ok(bar) = self.turn_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(format!("retry {} after: {}", attempt, error).yellow().to_string());
        }
    }

    fn on_turn_completed(&self, turn: &Turn) {
        let Some(pb) = self.take_bar() else {
            return;
        };
        if turn.is_ok() {
            pb.finish_with_message(format!(
                "{} {} tokens, {:.1}s",
                "v".green(),
                turn.tokens(),
                turn.latency_ms as f64 / 1000.0
            ));
        } else {
            pb.finish_with_message(format!(
                "{} {}",
                "x".red(),
                turn.error.as_deref().unwrap_or("failed").red()
            ));
        }
    }

    fn on_round_completed(&self, round: &Round, decision: &ContinueDecision) {
        let _ = self.multi.println(round_line(round, decision));
    }

    fn on_session_terminated(&self, _result: &SessionResult) {
        if let Some(pb) = self.take_bar() {
            pb.finish_and_clear();
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_turn_started(&self, round_index: u32, role_id: &RoleId, kind: TurnKind) {
        eprintln!("  {} round {} · {} · {}", "..".dimmed(), round_index + 1, role_id, kind);
    }

    fn on_turn_retrying(&self, role_id: &RoleId, attempt: u32, error: &str) {
        eprintln!("  {} {} retry {}: {}", "!".yellow(), role_id, attempt, error);
    }

    fn on_turn_completed(&self, turn: &Turn) {
        if turn.is_ok() {
            eprintln!("  {} {} ({} tokens)", "v".green(), turn.role_id, turn.tokens());
        } else {
            eprintln!("  {} {} (failed)", "x".red(), turn.role_id);
        }
    }

    fn on_round_completed(&self, round: &Round, decision: &ContinueDecision) {
        eprintln!("{}", round_line(round, decision));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_application::DebateEventBus;
    use debate_domain::TokenUsage;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Recorder {
        fn push(&self, entry: String) {
            self.0.lock().unwrap().push(entry);
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl ProgressNotifier for Recorder {
        fn on_turn_started(&self, round_index: u32, role_id: &RoleId, kind: TurnKind) {
            self.push(format!("start {} {} {}", round_index, role_id, kind));
        }

        fn on_turn_retrying(&self, role_id: &RoleId, attempt: u32, _error: &str) {
            self.push(format!("retry {} {}", role_id, attempt));
        }

        fn on_turn_completed(&self, turn: &Turn) {
            self.push(format!("done {}", turn.role_id));
        }

        fn on_round_completed(&self, round: &Round, _decision: &ContinueDecision) {
            self.push(format!("round {}", round.index));
        }
    }

    fn turn(role: &str) -> Turn {
        Turn::ok(
            RoleId::from(role),
            0,
            TurnKind::Opening,
            "text",
            TokenUsage::new(1, 1),
            5,
        )
    }

    #[tokio::test]
    async fn test_follow_filters_by_session_and_stops_on_close() {
        let bus = DebateEventBus::new();
        let events = bus.subscribe();
        let mine = SessionId::new();
        let other = SessionId::new();

        bus.publish(DebateEvent::TurnStarted {
            session_id: mine,
            round_index: 0,
            role_id: RoleId::from("pro"),
            kind: TurnKind::Opening,
        });
        bus.publish(DebateEvent::TurnStarted {
            session_id: other,
            round_index: 0,
            role_id: RoleId::from("intruder"),
            kind: TurnKind::Opening,
        });
        bus.publish(DebateEvent::TurnRetrying {
            session_id: mine,
            round_index: 0,
            role_id: RoleId::from("pro"),
            attempt: 1,
            error: "rate limited".to_string(),
        });
        bus.publish(DebateEvent::TurnCompleted {
            session_id: mine,
            turn: turn("pro"),
        });
        bus.publish(DebateEvent::RoundCompleted {
            session_id: mine,
            round: Round {
                index: 0,
                turns: vec![turn("pro")],
            },
            decision: ContinueDecision::Continue,
        });
        drop(bus);

        let recorder = Recorder::default();
        follow(&recorder, events, mine).await;
        assert_eq!(
            recorder.entries(),
            vec![
                "start 0 pro opening".to_string(),
                "retry pro 1".to_string(),
                "done pro".to_string(),
                "round 0".to_string(),
            ]
        );
    }

    #[test]
    fn test_round_line_mentions_stop_reason() {
        let round = Round {
            index: 1,
            turns: vec![turn("pro")],
        };
        let line = round_line(
            &round,
            &ContinueDecision::Stop(debate_domain::TerminationReason::TokenBudget),
        );
        assert!(line.contains("Round 2 complete"));
        assert!(line.contains("round token budget exceeded"));
    }
}
