//! Termination policy.
//!
//! - [`evaluator::TerminationEvaluator`] - hard/soft stop conditions checked after each round
//! - [`reason::TerminationReason`] - why a session ended
//! - [`consensus::ConsensusStrategy`] - pluggable source of the consensus signal
//! - [`parsing`] - verdict extraction from moderator text

pub mod consensus;
pub mod evaluator;
pub mod parsing;
pub mod reason;

pub use consensus::{
    ConsensusStrategy, ConsensusStrategyKind, ManualSignal, ModeratorVerdict, NeverConsensus,
};
pub use evaluator::{ContinueDecision, RoundOutcome, TerminationEvaluator};
pub use reason::TerminationReason;
