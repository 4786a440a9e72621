//! The append-only transcript store.

use super::entities::{Round, Turn};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How much of the transcript a role sees when it is invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextWindow {
    /// Every turn so far
    #[default]
    Full,
    /// Only the most recent `n` turns
    LastTurns(usize),
}

impl FromStr for ContextWindow {
    type Err = String;

    /// Accepts `full`, `last:N` or a bare `N`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "full" || s == "all" {
            return Ok(ContextWindow::Full);
        }
        let n = s.strip_prefix("last:").unwrap_or(&s);
        n.parse::<usize>()
            .map(ContextWindow::LastTurns)
            .map_err(|_| format!("Invalid context window: {} (expected full, last:N or N)", s))
    }
}

/// Owned slice of the transcript handed to an invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptWindow {
    pub turns: Vec<Turn>,
    /// Number of earlier turns left out
    pub omitted: usize,
}

impl TranscriptWindow {
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Ordered, append-only record of every turn in a session.
///
/// There is no way to remove or edit a turn once appended. Once the
/// session ends the transcript is moved into the result and only read.
///
/// Serialized as a plain array of turns; deserializing replays every turn
/// through [`Transcript::append`], so round order is checked there too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Turn>", into = "Vec<Turn>")]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl TryFrom<Vec<Turn>> for Transcript {
    type Error = DomainError;

    fn try_from(turns: Vec<Turn>) -> Result<Self, Self::Error> {
        let mut transcript = Transcript::new();
        for turn in turns {
            transcript.append(turn)?;
        }
        Ok(transcript)
    }
}

impl From<Transcript> for Vec<Turn> {
    fn from(transcript: Transcript) -> Self {
        transcript.turns
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn. Rounds never go backwards.
    pub fn append(&mut self, turn: Turn) -> Result<(), DomainError> {
        if let Some(last) = self.turns.last()
            && turn.round_index < last.round_index
        {
            return Err(DomainError::NonMonotonicRound {
                last: last.round_index,
                got: turn.round_index,
            });
        }
        self.turns.push(turn);
        Ok(())
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn turns_in_round(&self, index: u32) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(move |t| t.round_index == index)
    }

    /// Grouped view, one entry per round that has at least one turn
    pub fn rounds(&self) -> Vec<Round> {
        let mut rounds: Vec<Round> = Vec::new();
        for turn in &self.turns {
            match rounds.last_mut() {
                Some(round) if round.index == turn.round_index => round.turns.push(turn.clone()),
                _ => rounds.push(Round {
                    index: turn.round_index,
                    turns: vec![turn.clone()],
                }),
            }
        }
        rounds
    }

    pub fn round(&self, index: u32) -> Option<Round> {
        let turns: Vec<Turn> = self.turns_in_round(index).cloned().collect();
        (!turns.is_empty()).then_some(Round { index, turns })
    }

    /// Number of distinct rounds with at least one turn
    pub fn round_count(&self) -> u32 {
        let mut count = 0;
        let mut previous = None;
        for turn in &self.turns {
            if previous != Some(turn.round_index) {
                count += 1;
                previous = Some(turn.round_index);
            }
        }
        count
    }

    pub fn total_tokens(&self) -> u64 {
        self.turns.iter().map(Turn::tokens).sum()
    }

    pub fn tokens_for_round(&self, index: u32) -> u64 {
        self.turns_in_round(index).map(Turn::tokens).sum()
    }

    pub fn total_latency_ms(&self) -> u64 {
        self.turns.iter().map(|t| t.latency_ms).sum()
    }

    /// Failed turns at the tail of the transcript
    pub fn consecutive_failures(&self) -> usize {
        self.turns.iter().rev().take_while(|t| !t.is_ok()).count()
    }

    /// Context for the next invocation.
    ///
    /// When `keep_round` is set, the window is widened so every turn of
    /// that round is included regardless of the limit.
    pub fn window(&self, window: ContextWindow, keep_round: Option<u32>) -> TranscriptWindow {
        let mut start = match window {
            ContextWindow::Full => 0,
            ContextWindow::LastTurns(n) => self.turns.len().saturating_sub(n),
        };
        if let Some(round) = keep_round
            && let Some(first) = self.turns.iter().position(|t| t.round_index == round)
        {
            start = start.min(first);
        }
        TranscriptWindow {
            turns: self.turns[start..].to_vec(),
            omitted: start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::RoleId;
    use crate::schedule::TurnKind;
    use crate::transcript::entities::TokenUsage;

    fn ok(role: &str, round: u32, tokens: u64) -> Turn {
        Turn::ok(
            RoleId::from(role),
            round,
            TurnKind::Rebuttal,
            format!("{} speaks", role),
            TokenUsage::new(tokens, 0),
            10,
        )
    }

    fn failed(role: &str, round: u32) -> Turn {
        Turn::failed(RoleId::from(role), round, TurnKind::Rebuttal, "boom", 1)
    }

    fn sample() -> Transcript {
        let mut transcript = Transcript::new();
        for turn in [ok("pro", 0, 3), ok("con", 0, 4), ok("pro", 1, 5), ok("con", 1, 6)] {
            transcript.append(turn).unwrap();
        }
        transcript
    }

    #[test]
    fn test_deserialize_enforces_round_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        let back: Transcript = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());

        let backwards = serde_json::to_string(&vec![ok("pro", 1, 1), ok("con", 0, 1)]).unwrap();
        let err = serde_json::from_str::<Transcript>(&backwards).unwrap_err();
        assert!(err.to_string().contains("round"));
    }

    #[test]
    fn test_accounting() {
        let transcript = sample();
        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript.total_tokens(), 18);
        assert_eq!(transcript.tokens_for_round(0), 7);
        assert_eq!(transcript.tokens_for_round(1), 11);
        assert_eq!(transcript.tokens_for_round(7), 0);
        assert_eq!(transcript.total_latency_ms(), 40);
        assert_eq!(transcript.round_count(), 2);
    }

    #[test]
    fn test_rejects_earlier_round() {
        let mut transcript = sample();
        let err = transcript.append(ok("pro", 0, 1)).unwrap_err();
        assert_eq!(err, DomainError::NonMonotonicRound { last: 1, got: 0 });
        assert_eq!(transcript.len(), 4);

        // Same round and later rounds are fine
        transcript.append(ok("mod", 1, 1)).unwrap();
        transcript.append(ok("pro", 2, 1)).unwrap();
    }

    #[test]
    fn test_rounds_grouping() {
        let rounds = sample().rounds();
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[1].index, 1);
        assert_eq!(rounds[1].tokens(), 11);
        assert_eq!(sample().round(0).unwrap().turns.len(), 2);
        assert!(sample().round(5).is_none());
    }

    #[test]
    fn test_consecutive_failures_counts_tail_only() {
        let mut transcript = Transcript::new();
        transcript.append(failed("pro", 0)).unwrap();
        transcript.append(ok("con", 0, 1)).unwrap();
        transcript.append(failed("pro", 1)).unwrap();
        transcript.append(failed("con", 1)).unwrap();
        assert_eq!(transcript.consecutive_failures(), 2);
    }

    #[test]
    fn test_window_last_turns() {
        let window = sample().window(ContextWindow::LastTurns(1), None);
        assert_eq!(window.turns.len(), 1);
        assert_eq!(window.omitted, 3);

        let full = sample().window(ContextWindow::Full, None);
        assert_eq!(full.turns.len(), 4);
        assert_eq!(full.omitted, 0);
    }

    #[test]
    fn test_window_keeps_whole_round() {
        let window = sample().window(ContextWindow::LastTurns(1), Some(1));
        assert_eq!(window.turns.len(), 2);
        assert!(window.turns.iter().all(|t| t.round_index == 1));
    }

    #[test]
    fn test_context_window_from_str() {
        assert_eq!("full".parse::<ContextWindow>(), Ok(ContextWindow::Full));
        assert_eq!("last:4".parse::<ContextWindow>(), Ok(ContextWindow::LastTurns(4)));
        assert_eq!("6".parse::<ContextWindow>(), Ok(ContextWindow::LastTurns(6)));
        assert!("most".parse::<ContextWindow>().is_err());
    }
}
