//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod event_bus;
pub mod model_gateway;
pub mod transcript_logger;
pub mod turn_invoker;
