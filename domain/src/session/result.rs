//! The outcome of a finished debate.

use super::entities::{SessionId, SessionStatus};
use crate::core::question::Question;
use crate::role::{Role, RoleId};
use crate::termination::TerminationReason;
use crate::transcript::{TokenUsage, Transcript};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final result of a debate session.
///
/// Owns the transcript: once a session ends the transcript is moved here
/// and can only be read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub session_id: SessionId,
    pub question: Question,
    pub status: SessionStatus,
    pub termination_reason: TerminationReason,
    pub transcript: Transcript,
    /// Every configured role, for rendering names and colors
    pub roles: Vec<Role>,
    pub rounds_completed: u32,
    pub total_tokens: u64,
    /// `None` when summarization was off, skipped or failed
    pub summary_text: Option<String>,
    /// Tokens spent on the summary (not part of the transcript)
    pub summary_usage: Option<TokenUsage>,
    pub warnings: Vec<String>,
    /// The error that escalated the session to `failed`
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SessionResult {
    pub fn is_failed(&self) -> bool {
        self.status == SessionStatus::Failed
    }

    pub fn has_summary(&self) -> bool {
        self.summary_text
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }

    pub fn role(&self, id: &RoleId) -> Option<&Role> {
        self.roles.iter().find(|r| r.id() == id)
    }

    /// Wall-clock duration in milliseconds
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
