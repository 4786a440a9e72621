//! Turn Invoker port
//!
//! The contract for producing one role's next utterance. The controller
//! only talks to this trait; [`GatewayTurnInvoker`] is the default
//! implementation on top of a [`ModelGateway`].
//!
//! [`GatewayTurnInvoker`]: crate::use_cases::invoke_turn::GatewayTurnInvoker
//! [`ModelGateway`]: crate::ports::model_gateway::ModelGateway

use super::model_gateway::GatewayError;
use async_trait::async_trait;
use debate_domain::{Question, Role, TokenUsage, TranscriptWindow, TurnKind};
use std::time::Duration;
use thiserror::Error;

/// Why an invocation produced no utterance
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    #[error("invocation timed out")]
    Timeout,

    #[error("rate limited")]
    RateLimited { retry_after: Option<Duration> },

    #[error("malformed output: {0}")]
    MalformedOutput(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl From<GatewayError> for InvocationError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Timeout => InvocationError::Timeout,
            GatewayError::RateLimited { retry_after } => InvocationError::RateLimited { retry_after },
            GatewayError::MalformedResponse(msg) => InvocationError::MalformedOutput(msg),
            other => InvocationError::Transport(other.to_string()),
        }
    }
}

/// Everything an invoker needs to produce one turn
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub role: Role,
    pub kind: TurnKind,
    pub round_index: u32,
    pub question: Question,
    pub context: TranscriptWindow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub content: String,
    pub usage: TokenUsage,
    pub latency_ms: u64,
}

#[async_trait]
pub trait TurnInvoker: Send + Sync {
    async fn invoke(&self, request: &InvocationRequest) -> Result<Utterance, InvocationError>;
}
