//! Groq-backed gateway over the OpenAI-compatible chat completions API

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::{GenerationParams, LlmGateway};

/// Gateway implementation talking to Groq (or any OpenAI-compatible endpoint).
///
/// Performs no business logic and no retries; outbound concurrency is
/// bounded by a semaphore so many parallel runs cannot overwhelm the
/// provider.
pub struct GroqGateway {
    client: reqwest::Client,
    config: GatewayConfig,
    permits: Arc<Semaphore>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

impl GroqGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GatewayError::ProviderUnavailable(e.to_string()))?;

        let permits = Arc::new(Semaphore::new(config.max_concurrency.max(1)));

        Ok(Self {
            client,
            config,
            permits,
        })
    }

    fn map_status(status: reqwest::StatusCode, body: String) -> GatewayError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            GatewayError::RateLimited
        } else if status.is_server_error() {
            GatewayError::ProviderUnavailable(format!("status {status}"))
        } else {
            GatewayError::InvalidResponse(format!("status {status}: {body}"))
        }
    }

    fn extract_content(body: &str) -> Result<String, GatewayError> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| GatewayError::InvalidResponse(format!("undecodable body: {e}")))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(GatewayError::InvalidResponse("empty completion".to_string()));
        }

        Ok(content)
    }
}

#[async_trait]
impl LlmGateway for GroqGateway {
    async fn invoke(&self, prompt: &str, params: &GenerationParams) -> Result<String, GatewayError> {
        // Acquire never fails: the semaphore is never closed.
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| GatewayError::ProviderUnavailable("gateway shut down".to_string()))?;

        let model = self.config.model_for(params.model_class);
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        tracing::debug!(model, prompt_bytes = prompt.len(), "invoking provider");

        let mut builder = self.client.post(&self.config.api_url).json(&request);
        if let Some(key) = self.config.resolve_api_key() {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::ProviderUnavailable(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            return Err(Self::map_status(status, body));
        }

        Self::extract_content(&body)
    }
}
