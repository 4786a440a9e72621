//! The debate configuration contract.
//!
//! Field names are camelCase so a preset stored by an external
//! configuration store deserializes as-is:
//!
//! ```json
//! {
//!   "enabled": true,
//!   "maxRounds": 3,
//!   "autoEndConditions": { "consensusReached": false, "maxTokensPerRound": 4000, "timeoutMinutes": 10 },
//!   "roles": [{ "id": "pro-1", "stance": "pro", "systemPrompt": "..." }],
//!   "moderatorEnabled": false,
//!   "summaryEnabled": true
//! }
//! ```

use crate::core::error::ValidationError;
use crate::core::model::Model;
use crate::role::{RegistryOptions, RoleRegistry, RoleSpec, Stance};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Conditions that end a debate before `maxRounds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoEndConditions {
    /// Consult the consensus strategy after each round
    pub consensus_reached: bool,
    /// Stop once a single round uses more than this many tokens
    pub max_tokens_per_round: u64,
    /// Stop once the debate has run this long (checked between rounds)
    pub timeout_minutes: u64,
}

impl Default for AutoEndConditions {
    fn default() -> Self {
        Self {
            consensus_reached: false,
            max_tokens_per_round: 4000,
            timeout_minutes: 10,
        }
    }
}

impl AutoEndConditions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_minutes.saturating_mul(60))
    }
}

/// Resolved configuration for one debate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DebateConfig {
    pub enabled: bool,
    pub max_rounds: u32,
    pub auto_end_conditions: AutoEndConditions,
    pub roles: Vec<RoleSpec>,
    pub moderator_enabled: bool,
    pub summary_enabled: bool,
    /// Model for roles without a `modelId`
    pub default_model: Model,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_rounds: 3,
            auto_end_conditions: AutoEndConditions::default(),
            roles: Vec::new(),
            moderator_enabled: false,
            summary_enabled: false,
            default_model: Model::default(),
        }
    }
}

impl DebateConfig {
    pub fn new(roles: Vec<RoleSpec>) -> Self {
        Self {
            roles,
            ..Default::default()
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_moderator(mut self, enabled: bool) -> Self {
        self.moderator_enabled = enabled;
        self
    }

    pub fn with_summary(mut self, enabled: bool) -> Self {
        self.summary_enabled = enabled;
        self
    }

    pub fn with_max_tokens_per_round(mut self, tokens: u64) -> Self {
        self.auto_end_conditions.max_tokens_per_round = tokens;
        self
    }

    pub fn with_timeout_minutes(mut self, minutes: u64) -> Self {
        self.auto_end_conditions.timeout_minutes = minutes;
        self
    }

    pub fn with_consensus(mut self, enabled: bool) -> Self {
        self.auto_end_conditions.consensus_reached = enabled;
        self
    }

    pub fn with_default_model(mut self, model: Model) -> Self {
        self.default_model = model;
        self
    }

    /// Fill in the built-in role set when no roles are configured.
    ///
    /// Moderator and summary roles are only added when their flag is on.
    pub fn with_default_roles_if_empty(mut self) -> Self {
        if self.roles.is_empty() {
            self.roles = Self::default_roles(self.moderator_enabled, self.summary_enabled);
        }
        self
    }

    pub fn default_roles(moderator: bool, summary: bool) -> Vec<RoleSpec> {
        let mut roles = vec![
            RoleSpec::new(
                Stance::Pro,
                "You argue in favour of the proposition. Build the strongest honest case \
                 for it, cite concrete reasons, and answer the opposing arguments directly.",
            )
            .with_id("pro"),
            RoleSpec::new(
                Stance::Con,
                "You argue against the proposition. Expose weaknesses, risks and hidden \
                 costs, and answer the supporting arguments directly.",
            )
            .with_id("con"),
        ];
        if moderator {
            roles.push(
                RoleSpec::new(
                    Stance::Moderator,
                    "You moderate the debate. After each round, name the strongest point on \
                     each side, identify what is still disputed, and steer the next round. \
                     If the participants have converged, end with the line \
                     'CONSENSUS: REACHED'.",
                )
                .with_id("moderator"),
            );
        }
        if summary {
            roles.push(
                RoleSpec::new(
                    Stance::Summary,
                    "You write the final synthesis of a finished debate: the main arguments \
                     on each side, where they agree, and a balanced conclusion.",
                )
                .with_id("summary"),
            );
        }
        roles
    }

    /// Check numeric bounds and role rules.
    ///
    /// Returns the validated [`RoleRegistry`] so callers never have to
    /// validate twice.
    pub fn validate(&self) -> Result<RoleRegistry, ValidationError> {
        if !self.enabled {
            return Err(ValidationError::Disabled);
        }
        if self.max_rounds < 1 {
            return Err(ValidationError::InvalidMaxRounds(self.max_rounds));
        }
        if self.auto_end_conditions.max_tokens_per_round == 0 {
            return Err(ValidationError::InvalidTokenBudget);
        }
        if self.auto_end_conditions.timeout_minutes == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        RoleRegistry::build(
            &self.roles,
            &RegistryOptions {
                moderator_enabled: self.moderator_enabled,
                summary_enabled: self.summary_enabled,
                default_model: self.default_model.clone(),
            },
        )
    }
}
