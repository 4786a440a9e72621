//! Configuration file loading for quorum-debate
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DEBATE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./debate.toml` or `./.debate.toml`
//! 4. Global: `$XDG_CONFIG_HOME/quorum-debate/config.toml`
//! 5. Default values

mod error;
mod file_config;
mod loader;

pub use error::ConfigError;
pub use file_config::{
    FileConfig, FileConsensusConfig, FileInvocationConfig, FileLoggingConfig, FileOutputConfig,
    FileProviderConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
