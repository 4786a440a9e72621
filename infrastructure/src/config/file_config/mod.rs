//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.
//! The `[debate]` section is the [`DebateConfig`] contract itself, so its
//! keys are camelCase; every other section uses snake_case.

mod consensus;
mod invocation;
mod logging;
mod output;
mod provider;

pub use consensus::FileConsensusConfig;
pub use invocation::FileInvocationConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use provider::FileProviderConfig;

use debate_domain::{ConfigIssue, ConfigIssueCode, ConsensusStrategyKind, DebateConfig};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// The debate itself: rounds, auto-end conditions, roles
    pub debate: DebateConfig,
    /// Retry, failure escalation and context window
    pub invocation: FileInvocationConfig,
    /// Which consensus strategy is consulted
    pub consensus: FileConsensusConfig,
    /// Model service settings
    pub provider: FileProviderConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Transcript log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Role rules and numeric bounds of `[debate]` are checked when the
    /// debate starts; this covers the sections around it and how they
    /// combine with it.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Section-level parsing
        issues.extend(self.invocation.to_invocation_params().1);
        let (strategy, strategy_issues) = self.consensus.parse_strategy();
        issues.extend(strategy_issues);
        issues.extend(self.provider.validate());

        // 2. Consensus settings that cannot take effect
        let consensus_enabled = self.debate.auto_end_conditions.consensus_reached;
        if !consensus_enabled && strategy != ConsensusStrategyKind::None {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnusedSetting {
                    field: "consensus.strategy".to_string(),
                },
                format!(
                    "consensus.strategy is '{}' but debate.autoEndConditions.consensusReached is false; \
                     it will not be consulted",
                    strategy
                ),
            ));
        }
        if consensus_enabled && strategy == ConsensusStrategyKind::None {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnusedSetting {
                    field: "debate.autoEndConditions.consensusReached".to_string(),
                },
                "consensusReached is true but consensus.strategy is 'none'; consensus is never reached",
            ));
        }
        if consensus_enabled
            && strategy == ConsensusStrategyKind::Moderator
            && !self.debate.moderator_enabled
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnusedSetting {
                    field: "consensus.strategy".to_string(),
                },
                "consensus.strategy is 'moderator' but the moderator is disabled; \
                 no verdict will ever be given",
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_domain::{Model, OutputFormat, Stance};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r##"
[debate]
maxRounds = 4
moderatorEnabled = true
summaryEnabled = true
defaultModel = "claude-sonnet-4.5"

[debate.autoEndConditions]
consensusReached = true
maxTokensPerRound = 8000
timeoutMinutes = 15

[[debate.roles]]
id = "optimist"
name = "Optimist"
stance = "pro"
systemPrompt = "You see the upside."
color = "#22aa55"

[[debate.roles]]
stance = "con"
systemPrompt = "You see the risks."
modelId = "gpt-4.1"

[[debate.roles]]
stance = "moderator"
systemPrompt = "You keep order."

[[debate.roles]]
stance = "summary"
systemPrompt = "You conclude."

[consensus]
strategy = "moderator"

[output]
format = "full"
color = false
"##;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.debate.max_rounds, 4);
        assert!(config.debate.moderator_enabled);
        assert_eq!(config.debate.default_model, Model::ClaudeSonnet45);
        assert_eq!(config.debate.auto_end_conditions.max_tokens_per_round, 8000);
        assert_eq!(config.debate.roles.len(), 4);
        assert_eq!(config.debate.roles[1].model_id.as_deref(), Some("gpt-4.1"));
        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(config.validate().is_empty());

        let registry = config.debate.clone().with_default_roles_if_empty().validate().unwrap();
        assert_eq!(registry.debaters().len(), 2);
        assert_eq!(registry.debaters()[0].name(), "Optimist");
        assert!(registry.moderator().is_some());
        assert!(registry.summarizer().is_some());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[debate]
maxRounds = 2
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.debate.max_rounds, 2);
        // Defaults should apply
        assert_eq!(config.debate.auto_end_conditions.timeout_minutes, 10);
        assert!(config.output.color);
        assert_eq!(config.invocation.max_retries, 1);
    }

    #[test]
    fn test_default_config_uses_builtin_roles() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());

        let debate = config.debate.clone().with_default_roles_if_empty();
        assert_eq!(debate.roles.len(), 2);
        let registry = debate.validate().unwrap();
        assert_eq!(registry.debaters()[0].stance(), Stance::Pro);
        assert_eq!(registry.debaters()[1].stance(), Stance::Con);
    }

    #[test]
    fn test_strategy_without_consensus_flag_warns() {
        let mut config = FileConfig::default();
        config.consensus.strategy = "moderator".to_string();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].code,
            ConfigIssueCode::UnusedSetting {
                field: "consensus.strategy".to_string()
            }
        );
    }

    #[test]
    fn test_consensus_flag_without_strategy_warns() {
        let mut config = FileConfig::default();
        config.debate.auto_end_conditions.consensus_reached = true;
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_moderator_strategy_without_moderator_warns() {
        let mut config = FileConfig::default();
        config.debate.auto_end_conditions.consensus_reached = true;
        config.consensus.strategy = "moderator".to_string();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("moderator is disabled"));
    }
}
