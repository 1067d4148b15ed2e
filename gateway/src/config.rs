//! Gateway configuration

use serde::{Deserialize, Serialize};

/// Class of model to route a call to.
///
/// Stages pick a class for their latency/quality tradeoff; the gateway maps
/// the class to a concrete model name from its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelClass {
    /// Quick operations and scoring
    Fast,
    /// Complex reasoning
    Smart,
    /// Content generation
    Creative,
}

/// Provider configuration injected at gateway construction.
///
/// Passed explicitly rather than read from ambient state so concurrent runs
/// can use different configurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the OpenAI-compatible chat completions API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API key (falls back to the GROQ_API_KEY environment variable)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for the smart class
    #[serde(default = "default_model_smart")]
    pub model_smart: String,

    /// Model used for the fast class
    #[serde(default = "default_model_fast")]
    pub model_fast: String,

    /// Model used for the creative class
    #[serde(default = "default_model_creative")]
    pub model_creative: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on concurrent outbound calls across all runs
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_api_url() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_model_smart() -> String {
    "llama-3.1-70b-versatile".to_string()
}

fn default_model_fast() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_model_creative() -> String {
    "mixtral-8x7b-32768".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_max_concurrency() -> usize {
    4
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            model_smart: default_model_smart(),
            model_fast: default_model_fast(),
            model_creative: default_model_creative(),
            request_timeout_secs: default_request_timeout_secs(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl GatewayConfig {
    /// Concrete model name for a model class.
    pub fn model_for(&self, class: ModelClass) -> &str {
        match class {
            ModelClass::Fast => &self.model_fast,
            ModelClass::Smart => &self.model_smart,
            ModelClass::Creative => &self.model_creative,
        }
    }

    /// Resolve the API key from config or environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GROQ_API_KEY").ok())
    }
}
