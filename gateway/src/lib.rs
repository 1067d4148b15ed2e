//! LLM invocation gateway
//!
//! A narrow boundary between the content pipeline and the LLM provider:
//! submit a prompt plus generation parameters, receive generated text or a
//! failure. Retry policy lives with the caller, not here.

pub mod config;
pub mod error;
pub mod groq;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use config::{GatewayConfig, ModelClass};
pub use error::GatewayError;
pub use groq::GroqGateway;

/// Parameters for a single generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Which class of model to use (the gateway maps it to a concrete model)
    pub model_class: ModelClass,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Sampling temperature (0.0 = deterministic)
    pub temperature: f32,
}

impl GenerationParams {
    pub fn new(model_class: ModelClass, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model_class,
            max_tokens,
            temperature,
        }
    }
}

/// Uniform interface to the LLM provider.
///
/// Implementations must be stateless per call and safe for concurrent use by
/// multiple independent runs.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Submit a prompt and receive the generated text.
    async fn invoke(&self, prompt: &str, params: &GenerationParams) -> Result<String, GatewayError>;
}
