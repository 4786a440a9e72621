//! Gateway for OpenAI-compatible chat completion APIs.
//!
//! Works against OpenAI itself and against servers that speak the same
//! protocol (Azure OpenAI deployments, local inference servers).

use async_trait::async_trait;
use debate_application::{GatewayError, ModelGateway, ModelReply, ModelRequest};
use debate_domain::core::string::truncate;
use debate_domain::{ChatMessage, TokenUsage};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Longest error body carried into a [`GatewayError`]
const ERROR_BODY_LIMIT: usize = 300;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

pub struct OpenAiCompatibleGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl OpenAiCompatibleGateway {
    /// Build a gateway; `timeout` bounds each whole request.
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: Self::endpoint(base_url),
            api_key,
        })
    }

    fn endpoint(base_url: &str) -> String {
        format!("{}/chat/completions", base_url.trim_end_matches('/'))
    }

    fn body(request: &ModelRequest) -> ChatCompletionRequest<'_> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(ChatMessage::system(request.system_prompt.clone()));
        messages.extend(request.messages.iter().cloned());
        ChatCompletionRequest {
            model: request.model.as_str(),
            messages,
        }
    }

    fn parse_reply(body: &str) -> Result<ModelReply, GatewayError> {
        let response: ChatCompletionResponse = serde_json::from_str(body)
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                GatewayError::MalformedResponse("response contains no message content".to_string())
            })?;

        Ok(ModelReply {
            text,
            usage: response
                .usage
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens)),
        })
    }

    /// `Retry-After` in whole seconds; HTTP-date values are ignored
    fn retry_after(headers: &HeaderMap) -> Option<Duration> {
        headers
            .get(RETRY_AFTER)?
            .to_str()
            .ok()?
            .trim()
            .parse::<u64>()
            .ok()
            .map(Duration::from_secs)
    }

    fn status_error(
        status: StatusCode,
        headers: &HeaderMap,
        body: &str,
        model: &str,
    ) -> GatewayError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited {
                retry_after: Self::retry_after(headers),
            },
            StatusCode::NOT_FOUND => GatewayError::ModelNotAvailable(model.to_string()),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::Timeout,
            _ => GatewayError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate(body.trim(), ERROR_BODY_LIMIT)
            )),
        }
    }

    fn send_error(err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout
        } else if err.is_connect() {
            GatewayError::ConnectionError(err.to_string())
        } else {
            GatewayError::RequestFailed(err.to_string())
        }
    }
}

#[async_trait]
impl ModelGateway for OpenAiCompatibleGateway {
    async fn complete(&self, request: &ModelRequest) -> Result<ModelReply, GatewayError> {
        let model = request.model.as_str();
        debug!(model, endpoint = %self.endpoint, "Sending chat completion");

        let mut builder = self.client.post(&self.endpoint).json(&Self::body(request));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(Self::send_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(Self::send_error)?;

        if !status.is_success() {
            let err = Self::status_error(status, &headers, &body, model);
            warn!(model, status = status.as_u16(), "Chat completion failed: {}", err);
            return Err(err);
        }

        Self::parse_reply(&body)
    }
}
