//! Domain error types

use crate::session::entities::SessionStatus;
use thiserror::Error;

/// Configuration rejected before a debate session is created.
///
/// Surfaced synchronously from `start`; no session object exists when
/// one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Debate feature is disabled in this configuration")]
    Disabled,

    #[error("maxRounds must be at least 1 (got {0})")]
    InvalidMaxRounds(u32),

    #[error("maxTokensPerRound must be greater than 0")]
    InvalidTokenBudget,

    #[error("timeoutMinutes must be greater than 0")]
    InvalidTimeout,

    #[error("Question cannot be empty")]
    EmptyQuestion,

    #[error("Role '{role}' has no system prompt")]
    MissingSystemPrompt { role: String },

    #[error("Role '{role}' has no stance")]
    MissingStance { role: String },

    #[error("Role '{role}' has unknown stance '{stance}'")]
    UnknownStance { role: String, stance: String },

    #[error("At least 2 debater roles are required (found {found})")]
    TooFewDebaters { found: usize },

    #[error("At most one moderator role is allowed (found {found})")]
    TooManyModerators { found: usize },

    #[error("At most one summary role is allowed (found {found})")]
    TooManySummarizers { found: usize },

    #[error("moderatorEnabled is set but no moderator role is configured")]
    MissingModerator,
}

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Illegal session transition: {from} -> {to}")]
    IllegalTransition {
        from: SessionStatus,
        to: SessionStatus,
    },

    #[error("Turn for round {got} appended after round {last}")]
    NonMonotonicRound { last: u32, got: u32 },

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        let error = DomainError::Cancelled;
        assert_eq!(error.to_string(), "Operation cancelled");
        assert!(error.is_cancelled());
    }

    #[test]
    fn test_validation_error_wraps_into_domain_error() {
        let error: DomainError = ValidationError::TooFewDebaters { found: 1 }.into();
        assert!(!error.is_cancelled());
        assert_eq!(
            error.to_string(),
            "Invalid configuration: At least 2 debater roles are required (found 1)"
        );
    }

    #[test]
    fn test_illegal_transition_display() {
        let error = DomainError::IllegalTransition {
            from: SessionStatus::Completed,
            to: SessionStatus::Running,
        };
        assert_eq!(
            error.to_string(),
            "Illegal session transition: completed -> running"
        );
    }
}
