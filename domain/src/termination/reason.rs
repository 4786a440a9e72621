//! Why a debate session ended

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// `maxRounds` rounds completed
    RoundLimit,
    /// Wall-clock limit passed (checked between rounds)
    Timeout,
    /// The consensus strategy fired
    Consensus,
    /// A round used more than `maxTokensPerRound`
    TokenBudget,
    /// Stopped by the caller
    Cancelled,
    /// Too many consecutive failed turns
    Failed,
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::RoundLimit => "round_limit",
            TerminationReason::Timeout => "timeout",
            TerminationReason::Consensus => "consensus",
            TerminationReason::TokenBudget => "token_budget",
            TerminationReason::Cancelled => "cancelled",
            TerminationReason::Failed => "failed",
        }
    }

    /// Human-readable description for console output
    pub fn description(&self) -> &'static str {
        match self {
            TerminationReason::RoundLimit => "maximum number of rounds reached",
            TerminationReason::Timeout => "time limit exceeded",
            TerminationReason::Consensus => "participants reached consensus",
            TerminationReason::TokenBudget => "round token budget exceeded",
            TerminationReason::Cancelled => "stopped by user",
            TerminationReason::Failed => "too many consecutive failed turns",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
