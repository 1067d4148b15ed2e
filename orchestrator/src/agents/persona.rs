//! Persona analysis agent — first stage

use gateway::{GenerationParams, ModelClass};
use serde::Deserialize;

use crate::prompts::PERSONA_PROMPT;
use crate::state::{PersonaInsights, Stage, WorkflowState};

use super::extract::parse_object;
use super::{persona_section, request_section, StageAgent, StageError, StageOutput};

/// Analyzes the target persona against the brief. Later stages build on its
/// insights, so it favors the smart model class.
#[derive(Debug, Default)]
pub struct PersonaAgent;

impl PersonaAgent {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Deserialize)]
struct RawInsights {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    key_insights: Vec<String>,
    #[serde(default)]
    pain_point_focus: Vec<String>,
    #[serde(default)]
    content_angles: Vec<String>,
    #[serde(default)]
    motivation_triggers: Vec<String>,
    #[serde(default)]
    language_preferences: Option<String>,
}

impl StageAgent for PersonaAgent {
    fn stage(&self) -> Stage {
        Stage::Persona
    }

    fn params(&self) -> GenerationParams {
        GenerationParams::new(ModelClass::Smart, 1024, 0.2)
    }

    fn build_prompt(&self, state: &WorkflowState) -> String {
        format!(
            "{}\n{}\n{}",
            persona_section(&state.persona),
            request_section(&state.request),
            PERSONA_PROMPT
        )
    }

    fn parse(&self, response: &str, state: &WorkflowState) -> Result<StageOutput, StageError> {
        let raw: RawInsights = parse_object(response, "persona analysis")?;

        if raw.summary.trim().is_empty() {
            return Err(StageError::Parse(
                "persona analysis is missing the summary".to_string(),
            ));
        }
        if raw.key_insights.is_empty() {
            return Err(StageError::Parse(
                "persona analysis has no key insights".to_string(),
            ));
        }

        // No ranking from the model: keep the persona's own order so output
        // stays debuggable.
        let pain_point_focus = if raw.pain_point_focus.is_empty() {
            state.persona.pain_points.clone()
        } else {
            raw.pain_point_focus
        };

        Ok(StageOutput::Persona(PersonaInsights {
            summary: raw.summary,
            key_insights: raw.key_insights,
            pain_point_focus,
            content_angles: raw.content_angles,
            motivation_triggers: raw.motivation_triggers,
            language_preferences: raw.language_preferences,
        }))
    }
}
