//! Output formatter trait

use debate_domain::{OutputFormat, SessionResult};

/// Trait for formatting debate results
pub trait OutputFormatter {
    /// Every round and turn, then the summary
    fn format(&self, result: &SessionResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &SessionResult) -> String;

    /// Outcome and summary only (concise output)
    fn format_summary_only(&self, result: &SessionResult) -> String;

    fn render(&self, result: &SessionResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(result),
            OutputFormat::Summary => self.format_summary_only(result),
            OutputFormat::Json => self.format_json(result),
        }
    }
}
