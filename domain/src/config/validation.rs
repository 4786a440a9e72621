//! Non-fatal configuration findings.
//!
//! Fatal problems are [`ValidationError`](crate::core::error::ValidationError)s
//! and stop a debate from starting. Everything else the registry or the
//! config loader notices is reported as a [`ConfigIssue`] so callers can
//! log it and carry on.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A role's `color` was not `#rrggbb`; the stance default was used.
    InvalidColor { role: String, value: String },
    /// Two roles shared an id; the later one was renamed.
    DuplicateRoleId { id: String, renamed_to: String },
    /// A moderator role is configured but `moderatorEnabled` is false.
    UnusedModerator,
    /// A summary role is configured but `summaryEnabled` is false.
    UnusedSummarizer,
    /// `summaryEnabled` is true but there is no summary role.
    MissingSummarizer,
    /// A string field did not parse into its enum.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A numeric field is out of its allowed range.
    OutOfRange { field: String },
    /// A setting is present but has no effect with the rest of the config.
    UnusedSetting { field: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Check whether any issues are errors (i.e. fatal).
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(ConfigIssue::is_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_errors() {
        let warn = ConfigIssue::warning(ConfigIssueCode::UnusedModerator, "unused");
        assert!(!has_errors(std::slice::from_ref(&warn)));

        let err = ConfigIssue::error(
            ConfigIssueCode::OutOfRange {
                field: "debate.maxRounds".into(),
            },
            "must be >= 1",
        );
        assert!(has_errors(&[warn, err]));
    }
}
