//! Consensus configuration from TOML (`[consensus]` section)
//!
//! Only consulted when `debate.autoEndConditions.consensusReached` is true.
//!
//! ```toml
//! [consensus]
//! strategy = "moderator"   # "none" | "moderator" | "manual"
//! ```

use debate_domain::{ConfigIssue, ConfigIssueCode, ConsensusStrategyKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsensusConfig {
    pub strategy: String,
}

impl Default for FileConsensusConfig {
    fn default() -> Self {
        Self {
            strategy: ConsensusStrategyKind::default().to_string(),
        }
    }
}

impl FileConsensusConfig {
    /// Parse the strategy name, falling back to `none`
    pub fn parse_strategy(&self) -> (ConsensusStrategyKind, Vec<ConfigIssue>) {
        match self.strategy.parse::<ConsensusStrategyKind>() {
            Ok(kind) => (kind, vec![]),
            Err(_) => (
                ConsensusStrategyKind::default(),
                vec![ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "consensus.strategy".to_string(),
                        value: self.strategy.clone(),
                        valid_values: ConsensusStrategyKind::valid_values(),
                    },
                    format!(
                        "consensus.strategy: unknown value '{}', falling back to 'none'",
                        self.strategy
                    ),
                )],
            ),
        }
    }
}
