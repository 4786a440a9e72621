//! Model Gateway port
//!
//! Defines the interface for asking an external model service for a
//! completion. Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use debate_domain::{ChatMessage, Model, TokenUsage};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limited by provider")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Timeout")]
    Timeout,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),
}

/// One completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    pub model: Model,
    pub system_prompt: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub text: String,
    /// `None` when the provider does not report usage
    pub usage: Option<TokenUsage>,
}

/// Gateway to a model service
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn complete(&self, request: &ModelRequest) -> Result<ModelReply, GatewayError>;
}
