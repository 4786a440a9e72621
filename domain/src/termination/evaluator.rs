//! Termination Evaluator.
//!
//! Runs once after each fully completed round. Conditions are checked in
//! a fixed order and the first match wins:
//!
//! | # | Condition | Reason |
//! |---|-----------|--------|
//! | 1 | `maxRounds` rounds completed | `round_limit` |
//! | 2 | elapsed time exceeds `timeoutMinutes` | `timeout` |
//! | 3 | consensus signal (only when enabled) | `consensus` |
//! | 4 | the round's tokens exceed `maxTokensPerRound` | `token_budget` |
//!
//! Pure and synchronous: the caller measures time and asks the
//! consensus strategy.

use super::reason::TerminationReason;
use crate::config::DebateConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Facts about the round that just finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub rounds_completed: u32,
    pub elapsed: Duration,
    pub consensus: bool,
    pub round_tokens: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum ContinueDecision {
    Continue,
    Stop(TerminationReason),
}

impl ContinueDecision {
    pub fn is_stop(&self) -> bool {
        matches!(self, ContinueDecision::Stop(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationEvaluator {
    max_rounds: u32,
    timeout: Duration,
    consensus_enabled: bool,
    max_tokens_per_round: u64,
}

impl TerminationEvaluator {
    pub fn new(
        max_rounds: u32,
        timeout: Duration,
        consensus_enabled: bool,
        max_tokens_per_round: u64,
    ) -> Self {
        Self {
            max_rounds,
            timeout,
            consensus_enabled,
            max_tokens_per_round,
        }
    }

    pub fn from_config(config: &DebateConfig) -> Self {
        let end = &config.auto_end_conditions;
        Self::new(
            config.max_rounds,
            end.timeout(),
            end.consensus_reached,
            end.max_tokens_per_round,
        )
    }

    /// Whether the consensus strategy needs to be consulted at all
    pub fn checks_consensus(&self) -> bool {
        self.consensus_enabled
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn evaluate(&self, outcome: &RoundOutcome) -> ContinueDecision {
        if outcome.rounds_completed >= self.max_rounds {
            return ContinueDecision::Stop(TerminationReason::RoundLimit);
        }
        if outcome.elapsed > self.timeout {
            return ContinueDecision::Stop(TerminationReason::Timeout);
        }
        if self.consensus_enabled && outcome.consensus {
            return ContinueDecision::Stop(TerminationReason::Consensus);
        }
        if outcome.round_tokens > self.max_tokens_per_round {
            return ContinueDecision::Stop(TerminationReason::TokenBudget);
        }
        ContinueDecision::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> TerminationEvaluator {
        TerminationEvaluator::new(3, Duration::from_secs(60), true, 100)
    }

    fn outcome(rounds: u32) -> RoundOutcome {
        RoundOutcome {
            rounds_completed: rounds,
            elapsed: Duration::from_secs(1),
            consensus: false,
            round_tokens: 10,
        }
    }

    #[test]
    fn test_continue_when_nothing_matches() {
        assert_eq!(evaluator().evaluate(&outcome(1)), ContinueDecision::Continue);
    }

    #[test]
    fn test_each_condition() {
        let e = evaluator();
        assert_eq!(
            e.evaluate(&outcome(3)),
            ContinueDecision::Stop(TerminationReason::RoundLimit)
        );
        assert_eq!(
            e.evaluate(&RoundOutcome {
                elapsed: Duration::from_secs(61),
                ..outcome(1)
            }),
            ContinueDecision::Stop(TerminationReason::Timeout)
        );
        assert_eq!(
            e.evaluate(&RoundOutcome {
                consensus: true,
                ..outcome(1)
            }),
            ContinueDecision::Stop(TerminationReason::Consensus)
        );
        assert_eq!(
            e.evaluate(&RoundOutcome {
                round_tokens: 101,
                ..outcome(1)
            }),
            ContinueDecision::Stop(TerminationReason::TokenBudget)
        );
    }

    #[test]
    fn test_precedence_first_match_wins() {
        let everything = RoundOutcome {
            rounds_completed: 3,
            elapsed: Duration::from_secs(3600),
            consensus: true,
            round_tokens: 10_000,
        };
        let e = evaluator();
        assert_eq!(
            e.evaluate(&everything),
            ContinueDecision::Stop(TerminationReason::RoundLimit)
        );
        assert_eq!(
            e.evaluate(&RoundOutcome {
                rounds_completed: 1,
                ..everything
            }),
            ContinueDecision::Stop(TerminationReason::Timeout)
        );
        assert_eq!(
            e.evaluate(&RoundOutcome {
                rounds_completed: 1,
                elapsed: Duration::ZERO,
                ..everything
            }),
            ContinueDecision::Stop(TerminationReason::Consensus)
        );
    }

    #[test]
    fn test_budget_is_strictly_exceeded() {
        let e = evaluator();
        assert_eq!(
            e.evaluate(&RoundOutcome {
                round_tokens: 100,
                ..outcome(1)
            }),
            ContinueDecision::Continue
        );
    }

    #[test]
    fn test_consensus_ignored_when_disabled() {
        let e = TerminationEvaluator::new(3, Duration::from_secs(60), false, 100);
        assert!(!e.checks_consensus());
        assert_eq!(
            e.evaluate(&RoundOutcome {
                consensus: true,
                ..outcome(1)
            }),
            ContinueDecision::Continue
        );
    }

    #[test]
    fn test_from_config() {
        let config = DebateConfig::default()
            .with_max_rounds(5)
            .with_timeout_minutes(2)
            .with_consensus(true);
        let e = TerminationEvaluator::from_config(&config);
        assert_eq!(e.max_rounds(), 5);
        assert!(e.checks_consensus());
        assert_eq!(
            e.evaluate(&RoundOutcome {
                elapsed: Duration::from_secs(121),
                ..outcome(1)
            }),
            ContinueDecision::Stop(TerminationReason::Timeout)
        );
    }

    #[test]
    fn test_decision_serde() {
        let json = serde_json::to_value(ContinueDecision::Stop(TerminationReason::TokenBudget)).unwrap();
        assert_eq!(json["decision"], "stop");
        assert_eq!(json["reason"], "token_budget");
        assert_eq!(
            serde_json::to_value(ContinueDecision::Continue).unwrap()["decision"],
            "continue"
        );
    }
}
