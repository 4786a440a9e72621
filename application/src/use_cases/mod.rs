//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod engine;
pub mod invoke_turn;
pub mod run_debate;
pub(crate) mod shared;
pub mod summarize;
