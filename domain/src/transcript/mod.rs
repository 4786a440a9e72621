//! Transcript subdomain: the append-only record of a debate.
//!
//! - [`entities::Turn`] - one role's utterance (or failed attempt)
//! - [`entities::Round`] - a grouped, read-only view of one round's turns
//! - [`store::Transcript`] - the append-only store with token accounting

pub mod entities;
pub mod store;

pub use entities::{Round, TokenUsage, Turn, TurnOutcome};
pub use store::{ContextWindow, Transcript, TranscriptWindow};
