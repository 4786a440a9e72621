//! Model provider configuration from TOML (`[provider]` section)
//!
//! ```toml
//! [provider]
//! kind = "openai"                       # or "echo" for offline runs
//! base_url = "https://api.openai.com/v1"
//! api_key_env = "OPENAI_API_KEY"
//! request_timeout_seconds = 120
//! ```

use crate::providers::ProviderKind;
use debate_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    pub kind: String,
    /// Base URL of an OpenAI-compatible API (OpenAI, Azure, a local server)
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub request_timeout_seconds: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default().to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            request_timeout_seconds: 120,
        }
    }
}

impl FileProviderConfig {
    /// Parse the provider kind. An unknown kind is fatal.
    pub fn parse_kind(&self) -> (ProviderKind, Vec<ConfigIssue>) {
        match self.kind.parse::<ProviderKind>() {
            Ok(kind) => (kind, vec![]),
            Err(_) => (
                ProviderKind::default(),
                vec![ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "provider.kind".to_string(),
                        value: self.kind.clone(),
                        valid_values: ProviderKind::valid_values(),
                    },
                    format!("provider.kind: unknown provider '{}'", self.kind),
                )],
            ),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Read the API key from `api_key_env`
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let (_, mut issues) = self.parse_kind();
        if self.request_timeout_seconds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "provider.request_timeout_seconds".to_string(),
                },
                "provider.request_timeout_seconds: must be greater than 0",
            ));
        }
        if self.base_url.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "provider.base_url".to_string(),
                },
                "provider.base_url: cannot be empty",
            ));
        }
        issues
    }
}
