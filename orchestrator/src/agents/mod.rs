//! Pipeline stage agents
//!
//! Each agent is one pipeline stage: it renders a stage-specific prompt from
//! the workflow state, invokes the gateway with a model class suited to the
//! stage, and parses the response into the stage's structured schema.

pub mod creative;
pub mod extract;
pub mod persona;
pub mod qa;
pub mod strategy;

use async_trait::async_trait;
use gateway::{GatewayError, GenerationParams, LlmGateway};

use crate::persona::Persona;
use crate::request::ContentRequest;
use crate::state::{Stage, WorkflowState};

pub use creative::CreativeAgent;
pub use persona::PersonaAgent;
pub use qa::QaAgent;
pub use strategy::StrategyAgent;

/// Error from one stage attempt.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("gateway failure: {0}")]
    Gateway(#[from] GatewayError),

    /// The response did not satisfy the stage's structural schema
    #[error("parse error: {0}")]
    Parse(String),
}

impl StageError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Gateway(e) => e.is_retryable(),
            Self::Parse(_) => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Gateway(e) => e.kind(),
            Self::Parse(_) => "parse_error",
        }
    }
}

/// Typed partial-state update produced by a successful stage.
#[derive(Debug, Clone)]
pub enum StageOutput {
    Persona(crate::state::PersonaInsights),
    Strategy(crate::state::ContentStrategy),
    Creative(crate::state::DraftContent),
    Qa(crate::state::QaReport),
}

/// Successful stage execution: the update fragment plus a token estimate.
#[derive(Debug, Clone)]
pub struct StageSuccess {
    pub output: StageOutput,
    pub estimated_tokens: u64,
}

/// The mutation contract returned by an agent: a fragment or an error,
/// never both.
pub type StageResult = Result<StageSuccess, StageError>;

/// Shared contract for the four stage agents.
///
/// Preconditions: all state fields populated by strictly earlier stages
/// must be present; a violation is a programming error and panics.
#[async_trait]
pub trait StageAgent: Send + Sync {
    fn stage(&self) -> Stage;

    /// Model class and sampling parameters for this stage
    fn params(&self) -> GenerationParams;

    /// Render the stage prompt from the current state
    fn build_prompt(&self, state: &WorkflowState) -> String;

    /// Parse the raw response into the stage's structured schema
    fn parse(&self, response: &str, state: &WorkflowState) -> Result<StageOutput, StageError>;

    /// Prompt render + gateway call + parse.
    async fn run(&self, state: &WorkflowState, gateway: &dyn LlmGateway) -> StageResult {
        let prompt = self.build_prompt(state);
        let params = self.params();

        tracing::debug!(stage = %self.stage(), prompt_bytes = prompt.len(), "running stage agent");

        let response = gateway.invoke(&prompt, &params).await?;
        let output = self.parse(&response, state)?;

        Ok(StageSuccess {
            output,
            estimated_tokens: estimate_tokens(&prompt) + estimate_tokens(&response),
        })
    }
}

/// Rough token estimate (~4 bytes per token).
pub fn estimate_tokens(text: &str) -> u64 {
    (text.len() as u64 / 4).max(1)
}

/// Fetch an earlier stage's output, panicking on ordering violations.
pub(crate) fn require_output<'a, T>(output: &'a Option<T>, stage: Stage, needs: &str) -> &'a T {
    match output {
        Some(value) => value,
        None => panic!("{stage} agent invoked before {needs} was populated"),
    }
}

/// Persona context block shared by all stage prompts.
pub(crate) fn persona_section(persona: &Persona) -> String {
    let mut section = format!(
        "PERSONA PROFILE:\n- Name: {}\n- Industry: {}\n- Experience: {}\n",
        persona.name, persona.industry, persona.experience_level
    );
    if let Some(age) = &persona.age_range {
        section.push_str(&format!("- Age range: {age}\n"));
    }
    section.push_str(&format!("- Goals: {}\n", persona.primary_goals.join(", ")));
    section.push_str(&format!("- Pain points: {}\n", persona.pain_points.join(", ")));
    if !persona.preferred_channels.is_empty() {
        section.push_str(&format!(
            "- Preferred channels: {}\n",
            persona.preferred_channels.join(", ")
        ));
    }
    if let Some(tone) = &persona.tone_preference {
        section.push_str(&format!("- Preferred tone: {tone}\n"));
    }
    if let Some(description) = &persona.description {
        section.push_str(&format!("- Description: {description}\n"));
    }
    section
}

/// Request context block shared by all stage prompts.
pub(crate) fn request_section(request: &ContentRequest) -> String {
    let mut section = format!(
        "CONTENT REQUEST:\n- Topic: {}\n- Content type: {}\n- Platform: {}\n- Tone: {}\n- Include CTA: {}\n",
        request.topic,
        request.content_type.name(),
        request.platform,
        request.tone.name(),
        request.include_cta
    );
    if let Some(length) = request.length {
        section.push_str(&format!("- Length: {}\n", length.guidance()));
    }
    if !request.keywords.is_empty() {
        section.push_str(&format!("- Keywords: {}\n", request.keywords.join(", ")));
    }
    if let Some(context) = &request.context {
        section.push_str(&format!("- Additional context: {context}\n"));
    }
    section
}
