//! Application-level configuration.
//!
//! - [`InvocationParams`] - retry, failure escalation, context window and call timeouts

pub mod invocation_params;

pub use invocation_params::InvocationParams;
