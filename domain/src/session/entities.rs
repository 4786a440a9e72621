//! Session domain entities

use crate::config::DebateConfig;
use crate::core::error::DomainError;
use crate::core::question::Question;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a debate session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// First eight hex digits, for log lines and file names
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl std::str::FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Running => "running",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
            SessionStatus::Failed => "failed",
        }
    }

    /// Terminal statuses never change again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Completed | SessionStatus::Cancelled | SessionStatus::Failed
        )
    }

    fn can_transition_to(&self, to: SessionStatus) -> bool {
        matches!(
            (self, to),
            (SessionStatus::Idle, SessionStatus::Running)
                | (
                    SessionStatus::Running,
                    SessionStatus::Completed | SessionStatus::Cancelled | SessionStatus::Failed
                )
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One debate, from `start` to its terminal status (Entity)
#[derive(Debug, Clone)]
pub struct DebateSession {
    id: SessionId,
    question: Question,
    config: DebateConfig,
    status: SessionStatus,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl DebateSession {
    pub fn new(question: Question, config: DebateConfig) -> Self {
        Self {
            id: SessionId::new(),
            question,
            config,
            status: SessionStatus::Idle,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    /// Config snapshot taken at start
    pub fn config(&self) -> &DebateConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Move to `to`, enforcing the one-way lifecycle.
    pub fn transition(&mut self, to: SessionStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(to) {
            return Err(DomainError::IllegalTransition {
                from: self.status,
                to,
            });
        }
        match to {
            SessionStatus::Running => self.started_at = Some(Utc::now()),
            s if s.is_terminal() => self.finished_at = Some(Utc::now()),
            _ => {}
        }
        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> DebateSession {
        DebateSession::new(Question::new("Is tea better than coffee?").unwrap(), DebateConfig::default())
    }

    #[test]
    fn test_happy_path() {
        let mut s = session();
        assert_eq!(s.status(), SessionStatus::Idle);
        assert!(s.started_at().is_none());

        s.transition(SessionStatus::Running).unwrap();
        assert!(s.started_at().is_some());

        s.transition(SessionStatus::Completed).unwrap();
        assert!(s.status().is_terminal());
        assert!(s.finished_at().is_some());
    }

    #[test]
    fn test_terminal_status_is_final() {
        for terminal in [
            SessionStatus::Completed,
            SessionStatus::Cancelled,
            SessionStatus::Failed,
        ] {
            let mut s = session();
            s.transition(SessionStatus::Running).unwrap();
            s.transition(terminal).unwrap();
            for next in [
                SessionStatus::Idle,
                SessionStatus::Running,
                SessionStatus::Completed,
                SessionStatus::Cancelled,
                SessionStatus::Failed,
            ] {
                assert!(s.transition(next).is_err());
                assert_eq!(s.status(), terminal);
            }
        }
    }

    #[test]
    fn test_cannot_skip_running() {
        let mut s = session();
        let err = s.transition(SessionStatus::Completed).unwrap_err();
        assert_eq!(
            err,
            DomainError::IllegalTransition {
                from: SessionStatus::Idle,
                to: SessionStatus::Completed
            }
        );
    }

    #[test]
    fn test_session_ids_are_unique_and_parse_back() {
        let a = SessionId::new();
        let b = SessionId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string().parse::<SessionId>().unwrap(), a);
        assert_eq!(a.short().len(), 8);
    }
}
