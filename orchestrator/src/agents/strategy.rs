//! Strategy planning agent — second stage

use std::str::FromStr;

use gateway::{GenerationParams, ModelClass};
use serde::Deserialize;

use crate::prompts::STRATEGY_PROMPT;
use crate::state::{ContentStrategy, CtaPlan, FunnelStage, Stage, WorkflowState};

use super::extract::parse_object;
use super::{persona_section, request_section, require_output, StageAgent, StageError, StageOutput};

/// Positions the content in the funnel and plans messaging. Requires the
/// persona agent's insights.
#[derive(Debug, Default)]
pub struct StrategyAgent;

impl StrategyAgent {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Deserialize)]
struct RawStrategy {
    #[serde(default)]
    funnel_stage: String,
    #[serde(default)]
    key_messages: Vec<String>,
    #[serde(default)]
    recommended_angle: String,
    #[serde(default)]
    cta: Option<RawCta>,
    #[serde(default)]
    engagement_hooks: Vec<String>,
    #[serde(default)]
    value_proposition: Option<String>,
}

#[derive(Deserialize)]
struct RawCta {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    placement: Option<String>,
    #[serde(default)]
    message: String,
}

impl StageAgent for StrategyAgent {
    fn stage(&self) -> Stage {
        Stage::Strategy
    }

    fn params(&self) -> GenerationParams {
        GenerationParams::new(ModelClass::Smart, 1024, 0.3)
    }

    fn build_prompt(&self, state: &WorkflowState) -> String {
        let insights = require_output(&state.persona_insights, Stage::Strategy, "persona insights");

        let mut insights_section = format!(
            "PERSONA INSIGHTS:\n- Summary: {}\n- Key insights: {}\n- Pain point focus: {}\n",
            insights.summary,
            insights.key_insights.join("; "),
            insights.pain_point_focus.join("; ")
        );
        if !insights.content_angles.is_empty() {
            insights_section.push_str(&format!(
                "- Content angles: {}\n",
                insights.content_angles.join("; ")
            ));
        }
        if !insights.motivation_triggers.is_empty() {
            insights_section.push_str(&format!(
                "- Motivation triggers: {}\n",
                insights.motivation_triggers.join("; ")
            ));
        }

        format!(
            "{}\n{}\n{}\n{}",
            persona_section(&state.persona),
            request_section(&state.request),
            insights_section,
            STRATEGY_PROMPT
        )
    }

    fn parse(&self, response: &str, _state: &WorkflowState) -> Result<StageOutput, StageError> {
        let raw: RawStrategy = parse_object(response, "strategy plan")?;

        let funnel_stage = FunnelStage::from_str(&raw.funnel_stage)
            .map_err(|e| StageError::Parse(format!("strategy plan: {e}")))?;

        if raw.key_messages.is_empty() {
            return Err(StageError::Parse(
                "strategy plan has no key messages".to_string(),
            ));
        }

        let cta = match raw.cta {
            Some(raw_cta) if !raw_cta.message.trim().is_empty() => CtaPlan {
                kind: if raw_cta.kind.trim().is_empty() {
                    "learn_more".to_string()
                } else {
                    raw_cta.kind
                },
                placement: raw_cta.placement,
                message: raw_cta.message,
            },
            _ => CtaPlan::default(),
        };

        Ok(StageOutput::Strategy(ContentStrategy {
            funnel_stage,
            key_messages: raw.key_messages,
            recommended_angle: raw.recommended_angle,
            cta,
            engagement_hooks: raw.engagement_hooks,
            value_proposition: raw.value_proposition,
        }))
    }
}
