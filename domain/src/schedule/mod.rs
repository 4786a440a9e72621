//! Turn scheduling: who speaks, in what order, in each round.

pub mod scheduler;

pub use scheduler::{RoundPlan, ScheduledTurn, TurnKind, TurnScheduler};
