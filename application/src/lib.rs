//! Application layer for quorum-debate
//!
//! This crate contains the debate controller and engine, the ports they
//! depend on, and application configuration. It depends only on the
//! domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::InvocationParams;
pub use ports::{
    event_bus::{DebateEvent, DebateEventBus},
    model_gateway::{GatewayError, ModelGateway, ModelReply, ModelRequest},
    transcript_logger::{NoTranscriptLogger, TranscriptLogger},
    turn_invoker::{InvocationError, InvocationRequest, TurnInvoker, Utterance},
};
pub use use_cases::engine::{DebateEngine, SessionHandle};
pub use use_cases::invoke_turn::GatewayTurnInvoker;
pub use use_cases::run_debate::{DebateController, PreparedDebate, StartError};
pub use use_cases::summarize::{SummarizationFailure, Summarizer};
