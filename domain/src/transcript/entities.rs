//! Transcript entities

use crate::role::RoleId;
use crate::schedule::TurnKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Tokens consumed by one model call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt: u64,
    pub completion: u64,
}

impl TokenUsage {
    pub fn new(prompt: u64, completion: u64) -> Self {
        Self { prompt, completion }
    }

    pub fn total(&self) -> u64 {
        self.prompt.saturating_add(self.completion)
    }
}

impl Add for TokenUsage {
    type Output = TokenUsage;

    fn add(self, other: TokenUsage) -> TokenUsage {
        TokenUsage {
            prompt: self.prompt.saturating_add(other.prompt),
            completion: self.completion.saturating_add(other.completion),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnOutcome {
    Ok,
    Failed,
}

/// One role's contribution to a round (Entity)
///
/// A failed turn keeps its slot in the transcript with empty content,
/// zero usage and the last error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub role_id: RoleId,
    pub round_index: u32,
    pub kind: TurnKind,
    pub content: String,
    pub token_usage: TokenUsage,
    pub latency_ms: u64,
    pub timestamp: DateTime<Utc>,
    pub outcome: TurnOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Turn {
    pub fn ok(
        role_id: RoleId,
        round_index: u32,
        kind: TurnKind,
        content: impl Into<String>,
        token_usage: TokenUsage,
        latency_ms: u64,
    ) -> Self {
        Self {
            role_id,
            round_index,
            kind,
            content: content.into(),
            token_usage,
            latency_ms,
            timestamp: Utc::now(),
            outcome: TurnOutcome::Ok,
            error: None,
        }
    }

    pub fn failed(
        role_id: RoleId,
        round_index: u32,
        kind: TurnKind,
        error: impl Into<String>,
        latency_ms: u64,
    ) -> Self {
        Self {
            role_id,
            round_index,
            kind,
            content: String::new(),
            token_usage: TokenUsage::default(),
            latency_ms,
            timestamp: Utc::now(),
            outcome: TurnOutcome::Failed,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome == TurnOutcome::Ok
    }

    pub fn tokens(&self) -> u64 {
        self.token_usage.total()
    }
}

/// The turns of one round, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub index: u32,
    pub turns: Vec<Turn>,
}

impl Round {
    pub fn tokens(&self) -> u64 {
        self.turns.iter().map(Turn::tokens).sum()
    }

    pub fn failed_turns(&self) -> usize {
        self.turns.iter().filter(|t| !t.is_ok()).count()
    }
}
