//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] - the LLM a role is bound to
//! - [`question::Question`] - the validated question under debate
//! - [`error::DomainError`] / [`error::ValidationError`] - domain-level errors

pub mod error;
pub mod model;
pub mod question;
pub mod string;
