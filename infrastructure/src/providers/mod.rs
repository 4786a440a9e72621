//! Model gateway adapters
//!
//! [`build_gateway`] turns the `[provider]` config section into a
//! [`ModelGateway`] trait object for the debate controller.

pub mod echo;
#[cfg(feature = "openai")]
pub mod openai;

use crate::config::FileProviderConfig;
use debate_application::ModelGateway;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

pub use echo::EchoGateway;
#[cfg(feature = "openai")]
pub use openai::OpenAiCompatibleGateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Any OpenAI-compatible chat completions API
    #[default]
    OpenAi,
    /// Offline canned replies
    Echo,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Echo => "echo",
        }
    }

    pub fn valid_values() -> Vec<String> {
        vec!["openai".to_string(), "echo".to_string()]
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "open-ai" | "openai-compatible" => Ok(ProviderKind::OpenAi),
            "echo" | "offline" => Ok(ProviderKind::Echo),
            _ => Err(format!("Invalid provider kind: {}", s)),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider '{0}' is not compiled into this build")]
    NotCompiled(ProviderKind),

    #[error("no API key: set the {env} environment variable or use --offline")]
    MissingApiKey { env: String },

    #[error("could not build the HTTP client: {0}")]
    Client(String),
}

/// Build the gateway selected by `kind`
pub fn build_gateway(
    kind: ProviderKind,
    config: &FileProviderConfig,
) -> Result<Arc<dyn ModelGateway>, ProviderError> {
    match kind {
        ProviderKind::Echo => Ok(Arc::new(EchoGateway::new())),
        ProviderKind::OpenAi => build_openai(config),
    }
}

#[cfg(feature = "openai")]
fn build_openai(config: &FileProviderConfig) -> Result<Arc<dyn ModelGateway>, ProviderError> {
    let api_key = config.api_key();
    // Local servers usually take no key; the hosted API always does
    if api_key.is_none() && config.base_url.contains("api.openai.com") {
        return Err(ProviderError::MissingApiKey {
            env: config.api_key_env.clone(),
        });
    }
    let gateway =
        OpenAiCompatibleGateway::new(&config.base_url, api_key, config.request_timeout())
            .map_err(|e| ProviderError::Client(e.to_string()))?;
    Ok(Arc::new(gateway))
}

#[cfg(not(feature = "openai"))]
fn build_openai(_config: &FileProviderConfig) -> Result<Arc<dyn ModelGateway>, ProviderError> {
    Err(ProviderError::NotCompiled(ProviderKind::OpenAi))
}
