//! Offline gateway that answers every prompt with a canned statement.
//!
//! Replies are deterministic: the voice comes from the system prompt
//! framing, the topic from the `Debate question:` line of the turn
//! prompt. Moderator replies always end with `CONSENSUS: NOT REACHED`,
//! so an offline debate runs to its round limit.

use async_trait::async_trait;
use debate_application::{GatewayError, ModelGateway, ModelReply, ModelRequest};
use debate_domain::TokenUsage;
use debate_domain::core::string::estimate_tokens;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Voice {
    For,
    Against,
    Neutral,
    Moderator,
    Summary,
}

impl Voice {
    fn from_system_prompt(prompt: &str) -> Self {
        if prompt.contains("arguing FOR") {
            Voice::For
        } else if prompt.contains("arguing AGAINST") {
            Voice::Against
        } else if prompt.contains("moderator of") {
            Voice::Moderator
        } else if prompt.contains("final synthesis") {
            Voice::Summary
        } else {
            Voice::Neutral
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EchoGateway {
    delay: Duration,
}

impl EchoGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause before each reply, so progress output is visible offline
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn question(request: &ModelRequest) -> &str {
        request
            .messages
            .iter()
            .flat_map(|m| m.content.lines())
            .find_map(|line| line.strip_prefix("Debate question:"))
            .map(str::trim)
            .unwrap_or("the question")
    }

    fn reply(voice: Voice, question: &str, model: &str) -> String {
        match voice {
            Voice::For => format!(
                "[{model}] I support \"{question}\". The benefits are concrete and the \
                 risks can be managed with sensible safeguards."
            ),
            Voice::Against => format!(
                "[{model}] I oppose \"{question}\". The costs are underestimated and the \
                 promised benefits rest on optimistic assumptions."
            ),
            Voice::Neutral => format!(
                "[{model}] On \"{question}\", both sides make fair points; the answer \
                 depends on context and on how the trade-offs are weighed."
            ),
            Voice::Moderator => format!(
                "[{model}] Both sides argued \"{question}\" in good faith, but they still \
                 disagree on the balance of costs and benefits.\n\nCONSENSUS: NOT REACHED"
            ),
            Voice::Summary => format!(
                "## Conclusion\n\n[{model}] \"{question}\" has no single answer; it depends on \
                 the context.\n\n## Arguments For\n\n- Concrete benefits\n\n\
                 ## Arguments Against\n\n- Underestimated costs\n\n\
                 ## Common Ground\n\n- Safeguards matter"
            ),
        }
    }
}

#[async_trait]
impl ModelGateway for EchoGateway {
    async fn complete(&self, request: &ModelRequest) -> Result<ModelReply, GatewayError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let voice = Voice::from_system_prompt(&request.system_prompt);
        let text = Self::reply(voice, Self::question(request), request.model.as_str());

        let prompt_tokens = estimate_tokens(&request.system_prompt)
            + request
                .messages
                .iter()
                .map(|m| estimate_tokens(&m.content))
                .sum::<u64>();
        let usage = TokenUsage::new(prompt_tokens, estimate_tokens(&text));

        Ok(ModelReply {
            text,
            usage: Some(usage),
        })
    }
}
