//! Infrastructure layer for quorum-debate
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: model gateways, the JSONL transcript logger, and
//! configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, FileConfig, FileConsensusConfig, FileInvocationConfig,
    FileLoggingConfig, FileOutputConfig, FileProviderConfig,
};
pub use logging::JsonlTranscriptLogger;
pub use providers::{EchoGateway, ProviderError, ProviderKind, build_gateway};
#[cfg(feature = "openai")]
pub use providers::OpenAiCompatibleGateway;
