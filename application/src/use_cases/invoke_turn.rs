//! Default Turn Invoker: one role, one model call.
//!
//! Renders the role's prompts, calls the [`ModelGateway`], times the call
//! and rejects empty replies.

use crate::ports::model_gateway::{ModelGateway, ModelRequest};
use crate::ports::turn_invoker::{InvocationError, InvocationRequest, TurnInvoker, Utterance};
use async_trait::async_trait;
use debate_domain::core::string::estimate_tokens;
use debate_domain::{ChatMessage, PromptTemplate, TokenUsage};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

pub struct GatewayTurnInvoker<G: ModelGateway + ?Sized> {
    gateway: Arc<G>,
}

impl<G: ModelGateway + ?Sized> GatewayTurnInvoker<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Build the gateway request for one invocation
    pub fn build_request(request: &InvocationRequest) -> ModelRequest {
        let prompt = PromptTemplate::turn_prompt(
            request.kind,
            &request.question,
            request.round_index,
            &request.context,
        );
        ModelRequest {
            model: request.role.model().clone(),
            system_prompt: PromptTemplate::system_prompt(&request.role),
            messages: vec![ChatMessage::user(prompt)],
        }
    }
}

#[async_trait]
impl<G: ModelGateway + ?Sized> TurnInvoker for GatewayTurnInvoker<G> {
    async fn invoke(&self, request: &InvocationRequest) -> Result<Utterance, InvocationError> {
        let model_request = Self::build_request(request);
        debug!(
            role = %request.role.id(),
            model = %model_request.model,
            kind = %request.kind,
            "Invoking model"
        );

        let started = Instant::now();
        let reply = self.gateway.complete(&model_request).await?;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let content = reply.text.trim();
        if content.is_empty() {
            return Err(InvocationError::MalformedOutput(
                "model returned an empty reply".to_string(),
            ));
        }

        let usage = reply.usage.unwrap_or_else(|| {
            let prompt_chars: String = std::iter::once(model_request.system_prompt.as_str())
                .chain(model_request.messages.iter().map(|m| m.content.as_str()))
                .collect();
            TokenUsage::new(estimate_tokens(&prompt_chars), estimate_tokens(content))
        });

        Ok(Utterance {
            content: content.to_string(),
            usage,
            latency_ms,
        })
    }
}
