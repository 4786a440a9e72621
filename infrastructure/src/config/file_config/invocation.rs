//! Invocation configuration from TOML (`[invocation]` section)
//!
//! ```toml
//! [invocation]
//! max_retries = 1
//! failure_threshold = 3
//! context_window = "last:6"     # or "full"
//! call_timeout_seconds = 120
//! retry_delay_ms = 500
//! summarize_on_cancel = false
//! ```

use debate_application::InvocationParams;
use debate_domain::{ConfigIssue, ConfigIssueCode, ContextWindow};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInvocationConfig {
    pub max_retries: u32,
    pub failure_threshold: usize,
    /// "full", "last:N" or a bare "N"
    pub context_window: String,
    pub call_timeout_seconds: Option<u64>,
    pub retry_delay_ms: u64,
    pub summarize_on_cancel: bool,
}

impl Default for FileInvocationConfig {
    fn default() -> Self {
        let params = InvocationParams::default();
        Self {
            max_retries: params.max_retries,
            failure_threshold: params.failure_threshold,
            context_window: "full".to_string(),
            call_timeout_seconds: None,
            retry_delay_ms: 0,
            summarize_on_cancel: params.summarize_on_cancel,
        }
    }
}

impl FileInvocationConfig {
    /// Parse `context_window`, falling back to the full transcript
    pub fn parse_context_window(&self) -> (ContextWindow, Vec<ConfigIssue>) {
        match self.context_window.parse::<ContextWindow>() {
            Ok(ContextWindow::LastTurns(0)) => (
                ContextWindow::Full,
                vec![ConfigIssue::warning(
                    ConfigIssueCode::OutOfRange {
                        field: "invocation.context_window".to_string(),
                    },
                    "invocation.context_window: a window of 0 turns is useless, using 'full'",
                )],
            ),
            Ok(window) => (window, vec![]),
            Err(_) => (
                ContextWindow::Full,
                vec![ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "invocation.context_window".to_string(),
                        value: self.context_window.clone(),
                        valid_values: vec!["full".to_string(), "last:N".to_string()],
                    },
                    format!(
                        "invocation.context_window: unknown value '{}', falling back to 'full'",
                        self.context_window
                    ),
                )],
            ),
        }
    }

    /// Convert to [`InvocationParams`], reporting anything that was adjusted
    pub fn to_invocation_params(&self) -> (InvocationParams, Vec<ConfigIssue>) {
        let (window, mut issues) = self.parse_context_window();

        if self.failure_threshold == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "invocation.failure_threshold".to_string(),
                },
                "invocation.failure_threshold: must be at least 1, using 1",
            ));
        }

        let call_timeout = match self.call_timeout_seconds {
            Some(0) => {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::OutOfRange {
                        field: "invocation.call_timeout_seconds".to_string(),
                    },
                    "invocation.call_timeout_seconds: 0 disables the per-call timeout",
                ));
                None
            }
            other => other.map(Duration::from_secs),
        };

        let params = InvocationParams::default()
            .with_max_retries(self.max_retries)
            .with_failure_threshold(self.failure_threshold)
            .with_context_window(window)
            .with_call_timeout(call_timeout)
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms))
            .with_summarize_on_cancel(self.summarize_on_cancel);

        (params, issues)
    }
}
