//! Presentation layer for quorum-debate
//!
//! This crate contains the CLI definition, result formatters and the
//! progress reporters that follow a running debate.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, ConsensusArg, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressNotifier, ProgressReporter, SimpleProgress, follow};
