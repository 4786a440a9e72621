//! Console output formatter for debate results

use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use debate_domain::{DisplayColor, SessionResult, SessionStatus, Turn};

/// Formats debate results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete debate: every round, the outcome, the summary
    pub fn format(result: &SessionResult) -> String {
        let mut output = String::new();

        // Header
        output.push_str(&Self::header("Debate Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            result.question
        ));

        output.push_str(&format!("{}\n", "Participants:".cyan().bold()));
        for role in &result.roles {
            output.push_str(&format!(
                "  {} {}\n",
                Self::role_label(role.name(), role.color()),
                format!("({}, {})", role.stance(), role.model()).dimmed()
            ));
        }

        for round in result.transcript.rounds() {
            output.push_str(&Self::section_header(&format!(
                "Round {} ({} tokens)",
                round.index + 1,
                round.tokens()
            )));
            for turn in &round.turns {
                output.push_str(&Self::format_turn(result, turn));
            }
        }

        output.push_str(&Self::section_header("Outcome"));
        output.push_str(&Self::outcome(result));

        if !result.warnings.is_empty() {
            output.push_str(&format!("\n{}\n", "Warnings:".yellow().bold()));
            for warning in &result.warnings {
                output.push_str(&format!("  * {}\n", warning));
            }
        }

        if let Some(summary) = result.summary_text.as_deref().filter(|_| result.has_summary()) {
            output.push_str(&Self::section_header("Summary"));
            output.push_str(&format!("\n{}\n", summary.trim()));
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(result: &SessionResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format outcome and summary only (concise output)
    pub fn format_summary_only(result: &SessionResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Debate Conclusion ===".cyan().bold()
        ));

        output.push_str(&format!("{} {}\n\n", "Q:".bold(), result.question));
        output.push_str(&Self::outcome(result));
        output.push('\n');

        match result.summary_text.as_deref() {
            Some(summary) if result.has_summary() => {
                output.push_str(summary.trim());
                output.push('\n');
            }
            _ => {
                output.push_str(&format!("{}\n", "(no summary)".dimmed()));
            }
        }

        if !result.warnings.is_empty() {
            output.push_str(&format!(
                "\n{}\n",
                format!("{} warning(s); use -o full to see them", result.warnings.len()).yellow()
            ));
        }

        output
    }

    /// A role name in its display color
    pub fn role_label(name: &str, color: &DisplayColor) -> ColoredString {
        let (r, g, b) = color.rgb();
        name.truecolor(r, g, b).bold()
    }

    fn format_turn(result: &SessionResult, turn: &Turn) -> String {
        let (name, label) = match result.role(&turn.role_id) {
            Some(role) => (
                role.name().to_string(),
                Self::role_label(&format!("── {} · {} ──", role.name(), turn.kind), role.color()),
            ),
            None => {
                let name = turn.role_id.to_string();
                let label = format!("── {} · {} ──", name, turn.kind).bold();
                (name, label)
            }
        };

        if turn.is_ok() {
            format!(
                "\n{} {}\n{}\n",
                label,
                format!("{} tokens, {} ms", turn.tokens(), turn.latency_ms).dimmed(),
                turn.content.trim()
            )
        } else {
            format!(
                "\n{}\n{}\n",
                label,
                format!(
                    "{} did not respond: {}",
                    name,
                    turn.error.as_deref().unwrap_or("unknown error")
                )
                .red()
            )
        }
    }

    fn outcome(result: &SessionResult) -> String {
        let status = match result.status {
            SessionStatus::Completed => result.status.to_string().green().bold(),
            SessionStatus::Cancelled => result.status.to_string().yellow().bold(),
            _ => result.status.to_string().red().bold(),
        };
        let mut output = format!(
            "{} {} ({})\n{} {} round(s), {} tokens, {:.1}s\n",
            "Status:".bold(),
            status,
            result.termination_reason.description(),
            "Ran:".bold(),
            result.rounds_completed,
            result.total_tokens,
            result.duration_ms() as f64 / 1000.0
        );
        output.push_str(&format!(
            "{} {} turn(s) over {} round(s), {:.1}s waiting on models\n",
            "Transcript:".bold(),
            result.transcript.len(),
            result.transcript.round_count(),
            result.transcript.total_latency_ms() as f64 / 1000.0
        ));
        if let Some(error) = &result.error {
            output.push_str(&format!("{} {}\n", "Error:".red().bold(), error));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &SessionResult) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &SessionResult) -> String {
        Self::format_json(result)
    }

    fn format_summary_only(&self, result: &SessionResult) -> String {
        Self::format_summary_only(result)
    }
}
