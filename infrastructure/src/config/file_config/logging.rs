//! Transcript logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for `<session>.transcript.jsonl` files; unset disables transcript logging
    pub transcript_dir: Option<PathBuf>,
}

impl FileLoggingConfig {
    /// Transcript path for a session, with a leading `~/` expanded
    pub fn transcript_path(&self, session: &str) -> Option<PathBuf> {
        let dir = self.transcript_dir.as_ref()?;
        let dir = match dir.strip_prefix("~") {
            Ok(rest) => dirs::home_dir().map(|home| home.join(rest))?,
            Err(_) => dir.clone(),
        };
        Some(dir.join(format!("{}.transcript.jsonl", session)))
    }
}
