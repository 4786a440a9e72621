//! CLI command definitions

use clap::{Parser, ValueEnum};
use debate_domain::{ConsensusStrategyKind, DebateConfig};
use std::path::PathBuf;

/// Output format for debate results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every round and turn, then the summary
    Full,
    /// Termination reason and summary only
    #[value(alias = "synthesis")]
    Summary,
    /// The session result as JSON
    Json,
}

impl From<OutputFormat> for debate_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => debate_domain::OutputFormat::Full,
            OutputFormat::Summary => debate_domain::OutputFormat::Summary,
            OutputFormat::Json => debate_domain::OutputFormat::Json,
        }
    }
}

/// Consensus strategies selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConsensusArg {
    /// Never declare consensus
    None,
    /// Read the moderator's CONSENSUS verdict after each round
    Moderator,
}

impl From<ConsensusArg> for ConsensusStrategyKind {
    fn from(arg: ConsensusArg) -> Self {
        match arg {
            ConsensusArg::None => ConsensusStrategyKind::None,
            ConsensusArg::Moderator => ConsensusStrategyKind::Moderator,
        }
    }
}

/// CLI arguments for quorum-debate
#[derive(Parser, Debug)]
#[command(name = "quorum-debate")]
#[command(author, version, about = "Structured multi-round debates between AI roles")]
#[command(long_about = r#"
Quorum Debate runs a structured debate between AI roles on a question.

Each round every debater speaks once in configured order, optionally
followed by a moderator. The debate ends at the round limit, on timeout,
on consensus, when a round exceeds its token budget, or on Ctrl-C. An
optional summarizer then writes the final synthesis.

Configuration files are loaded from (in priority order):
1. DEBATE_* environment variables
2. --config <path>     Explicit config file
3. ./debate.toml       Project-level config
4. ~/.config/quorum-debate/config.toml   Global config

Example:
  quorum-debate "Should we rewrite the billing service in Rust?"
  quorum-debate --rounds 2 --moderator --summary -o full "Tabs or spaces?"
  quorum-debate --offline --summary "Is remote work here to stay?"
"#)]
pub struct Cli {
    /// The question to debate
    pub question: Option<String>,

    /// Maximum number of rounds
    #[arg(short, long, value_name = "N")]
    pub rounds: Option<u32>,

    /// Enable the moderator turn at the end of every round
    #[arg(long)]
    pub moderator: bool,

    /// Enable the final summary
    #[arg(long)]
    pub summary: bool,

    /// End the debate early when the strategy detects consensus
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub consensus: Option<ConsensusArg>,

    /// Stop after a round that uses more tokens than this
    #[arg(long, value_name = "TOKENS")]
    pub max_tokens_per_round: Option<u64>,

    /// Stop once the debate has run this long
    #[arg(long, value_name = "MINUTES")]
    pub timeout_minutes: Option<u64>,

    /// Use the offline echo gateway instead of a model service
    #[arg(long)]
    pub offline: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Also write operation logs to daily files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the file configuration.
    ///
    /// Absent flags keep the configured value.
    pub fn apply_overrides(&self, mut config: DebateConfig) -> DebateConfig {
        if let Some(rounds) = self.rounds {
            config = config.with_max_rounds(rounds);
        }
        if self.moderator {
            config = config.with_moderator(true);
        }
        if self.summary {
            config = config.with_summary(true);
        }
        if let Some(tokens) = self.max_tokens_per_round {
            config = config.with_max_tokens_per_round(tokens);
        }
        if let Some(minutes) = self.timeout_minutes {
            config = config.with_timeout_minutes(minutes);
        }
        if let Some(strategy) = self.consensus {
            config = config.with_consensus(strategy != ConsensusArg::None);
        }
        config
    }

    /// `RUST_LOG`-style filter for the `-v` count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["quorum-debate", "Tabs or spaces?"]).unwrap();
        assert_eq!(cli.question.as_deref(), Some("Tabs or spaces?"));
        assert!(cli.output.is_none());
        assert!(!cli.offline);
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_parse_all_overrides() {
        let cli = Cli::try_parse_from([
            "quorum-debate",
            "--rounds",
            "5",
            "--moderator",
            "--summary",
            "--consensus",
            "moderator",
            "--max-tokens-per-round",
            "9000",
            "--timeout-minutes",
            "3",
            "-o",
            "synthesis",
            "-vv",
            "Q?",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Summary));
        assert_eq!(cli.log_level(), "debug");

        let config = cli.apply_overrides(DebateConfig::default());
        assert_eq!(config.max_rounds, 5);
        assert!(config.moderator_enabled);
        assert!(config.summary_enabled);
        assert!(config.auto_end_conditions.consensus_reached);
        assert_eq!(config.auto_end_conditions.max_tokens_per_round, 9000);
        assert_eq!(config.auto_end_conditions.timeout_minutes, 3);
    }

    #[test]
    fn test_absent_flags_keep_file_values() {
        let cli = Cli::try_parse_from(["quorum-debate", "Q?"]).unwrap();
        let file = DebateConfig::default()
            .with_max_rounds(7)
            .with_summary(true)
            .with_consensus(true);
        assert_eq!(cli.apply_overrides(file.clone()), file);
    }

    #[test]
    fn test_consensus_none_disables_checking() {
        let cli = Cli::try_parse_from(["quorum-debate", "--consensus", "none", "Q?"]).unwrap();
        let config = cli.apply_overrides(DebateConfig::default().with_consensus(true));
        assert!(!config.auto_end_conditions.consensus_reached);
    }

    #[test]
    fn test_output_format_maps_to_domain() {
        assert_eq!(
            debate_domain::OutputFormat::from(OutputFormat::Json),
            debate_domain::OutputFormat::Json
        );
    }
}
