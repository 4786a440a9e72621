//! Domain layer for quorum-debate
//!
//! This crate contains the core rules of a debate: who takes part, in
//! what order they speak, what is recorded, and when the debate stops.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Roles
//!
//! A debate has at least two debaters (`pro`, `con`, `neutral`), an
//! optional moderator who closes every round, and an optional summarizer
//! who writes the final synthesis. [`RoleRegistry`] validates the
//! configured roles and partitions them.
//!
//! ## Rounds and the transcript
//!
//! Each round the [`TurnScheduler`] orders the debaters (then the
//! moderator). Every turn, successful or failed, is appended to the
//! [`Transcript`], which is never edited afterwards.
//!
//! ## Termination
//!
//! After each round the [`TerminationEvaluator`] checks, in order: round
//! limit, timeout, consensus, token budget.

pub mod config;
pub mod core;
pub mod prompt;
pub mod role;
pub mod schedule;
pub mod session;
pub mod termination;
pub mod transcript;

// Re-export commonly used types
pub use config::{
    AutoEndConditions, ConfigIssue, ConfigIssueCode, DebateConfig, OutputFormat, Severity,
};
pub use core::{
    error::{DomainError, ValidationError},
    model::Model,
    question::Question,
};
pub use prompt::{ChatMessage, MessageRole, PromptTemplate};
pub use role::{DisplayColor, RegistryOptions, Role, RoleId, RoleRegistry, RoleSpec, Stance};
pub use schedule::{RoundPlan, ScheduledTurn, TurnKind, TurnScheduler};
pub use session::{DebateSession, SessionId, SessionResult, SessionStatus};
pub use termination::{
    ConsensusStrategy, ConsensusStrategyKind, ContinueDecision, ManualSignal, ModeratorVerdict,
    NeverConsensus, RoundOutcome, TerminationEvaluator, TerminationReason,
};
pub use transcript::{ContextWindow, Round, TokenUsage, Transcript, TranscriptWindow, Turn, TurnOutcome};
