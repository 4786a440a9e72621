//! Consensus strategies.
//!
//! Whether a debate has converged is a heuristic, not a guarantee. The
//! evaluator only asks the configured [`ConsensusStrategy`] when
//! `autoEndConditions.consensusReached` is on.

use super::parsing::is_consensus_reached;
use crate::core::question::Question;
use crate::schedule::TurnKind;
use crate::transcript::Transcript;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Source of the consensus signal, consulted once per completed round.
pub trait ConsensusStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn assess(&self, question: &Question, transcript: &Transcript, round_index: u32) -> bool;
}

/// Never reports consensus (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConsensus;

impl ConsensusStrategy for NeverConsensus {
    fn name(&self) -> &'static str {
        "none"
    }

    fn assess(&self, _question: &Question, _transcript: &Transcript, _round_index: u32) -> bool {
        false
    }
}

/// Fires when the moderator's turn in the round carries an affirmative
/// `CONSENSUS:` verdict line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeratorVerdict;

impl ConsensusStrategy for ModeratorVerdict {
    fn name(&self) -> &'static str {
        "moderator"
    }

    fn assess(&self, _question: &Question, transcript: &Transcript, round_index: u32) -> bool {
        transcript
            .turns_in_round(round_index)
            .filter(|t| t.kind == TurnKind::Moderation && t.is_ok())
            .any(|t| is_consensus_reached(&t.content))
    }
}

/// Externally raised trigger, e.g. wired to a "they agree" button.
#[derive(Debug, Clone, Default)]
pub struct ManualSignal {
    flag: Arc<AtomicBool>,
}

impl ManualSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Shared flag for whoever raises the signal
    pub fn handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

impl ConsensusStrategy for ManualSignal {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn assess(&self, _question: &Question, _transcript: &Transcript, _round_index: u32) -> bool {
        self.is_raised()
    }
}

/// Config selector for the built-in strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusStrategyKind {
    #[default]
    None,
    Moderator,
    Manual,
}

impl ConsensusStrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusStrategyKind::None => "none",
            ConsensusStrategyKind::Moderator => "moderator",
            ConsensusStrategyKind::Manual => "manual",
        }
    }

    pub fn valid_values() -> Vec<String> {
        vec!["none".into(), "moderator".into(), "manual".into()]
    }

    /// A fresh strategy of this kind. A `Manual` one starts lowered and
    /// only the caller holding it can raise it.
    pub fn build(&self) -> Arc<dyn ConsensusStrategy> {
        match self {
            ConsensusStrategyKind::None => Arc::new(NeverConsensus),
            ConsensusStrategyKind::Moderator => Arc::new(ModeratorVerdict),
            ConsensusStrategyKind::Manual => Arc::new(ManualSignal::new()),
        }
    }
}

impl fmt::Display for ConsensusStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConsensusStrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "never" | "off" => Ok(ConsensusStrategyKind::None),
            "moderator" | "verdict" => Ok(ConsensusStrategyKind::Moderator),
            "manual" => Ok(ConsensusStrategyKind::Manual),
            _ => Err(format!("Invalid consensus strategy: {}", s)),
        }
    }
}
