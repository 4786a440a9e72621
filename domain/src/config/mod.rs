//! Configuration value objects for the domain layer
//!
//! [`DebateConfig`] is the external data contract a debate is started
//! with; the rest are shared across layers.

mod debate_config;
mod output_format;
pub mod validation;

pub use debate_config::{AutoEndConditions, DebateConfig};
pub use output_format::OutputFormat;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity, has_errors};
