//! Quality assurance agent — final stage

use gateway::{GenerationParams, ModelClass};
use serde::Deserialize;

use crate::prompts::QA_PROMPT;
use crate::state::{DraftContent, QaReport, Stage, WorkflowState};

use super::extract::parse_object;
use super::{persona_section, request_section, require_output, StageAgent, StageError, StageOutput};

/// Scores the draft against persona and strategy. Below the threshold the
/// model must supply a revision; scoring is cheap, so the fast model class.
#[derive(Debug)]
pub struct QaAgent {
    threshold: u8,
}

impl QaAgent {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }
}

#[derive(Deserialize)]
struct RawReport {
    alignment_score: Option<i64>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    improvement_suggestions: Vec<String>,
    #[serde(default)]
    assessment: Option<String>,
    #[serde(default)]
    revised: Option<RawRevision>,
}

#[derive(Deserialize)]
struct RawRevision {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: String,
    #[serde(default)]
    call_to_action: Option<String>,
    #[serde(default)]
    meta_description: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

impl StageAgent for QaAgent {
    fn stage(&self) -> Stage {
        Stage::Qa
    }

    fn params(&self) -> GenerationParams {
        GenerationParams::new(ModelClass::Fast, 1024, 0.2)
    }

    fn build_prompt(&self, state: &WorkflowState) -> String {
        let strategy = require_output(&state.strategy, Stage::Qa, "content strategy");
        let draft = require_output(&state.draft_content, Stage::Qa, "draft content");

        let strategy_section = format!(
            "CONTENT STRATEGY:\n- Funnel stage: {}\n- Key messages: {}\n- CTA: {}\n",
            strategy.funnel_stage.name(),
            strategy.key_messages.join("; "),
            strategy.cta.message
        );

        let mut draft_section = String::from("DRAFT CONTENT:\n");
        if let Some(title) = &draft.title {
            draft_section.push_str(&format!("Title: {title}\n"));
        }
        draft_section.push_str(&format!("{}\n", draft.body));
        if let Some(cta) = &draft.call_to_action {
            draft_section.push_str(&format!("CTA: {cta}\n"));
        }

        format!(
            "{}\n{}\n{}\n{}\nREVISION THRESHOLD: {}\n\n{}",
            persona_section(&state.persona),
            request_section(&state.request),
            strategy_section,
            draft_section,
            self.threshold,
            QA_PROMPT
        )
    }

    fn parse(&self, response: &str, _state: &WorkflowState) -> Result<StageOutput, StageError> {
        let raw: RawReport = parse_object(response, "quality report")?;

        let score = raw
            .alignment_score
            .ok_or_else(|| StageError::Parse("quality report is missing the alignment score".to_string()))?;
        if !(0..=100).contains(&score) {
            return Err(StageError::Parse(format!(
                "alignment score {score} is outside 0-100"
            )));
        }
        let alignment_score = score as u8;

        let revised = raw
            .revised
            .filter(|r| !r.body.trim().is_empty())
            .map(|r| {
                let mut draft = DraftContent {
                    title: r.title.filter(|t| !t.trim().is_empty()),
                    body: r.body.trim().to_string(),
                    call_to_action: r.call_to_action.filter(|c| !c.trim().is_empty()),
                    meta_description: r.meta_description,
                    tags: r.tags,
                    word_count: 0,
                };
                draft.word_count = draft.computed_word_count();
                draft
            });

        if alignment_score < self.threshold && revised.is_none() {
            return Err(StageError::Parse(format!(
                "alignment score {alignment_score} is below the threshold {} but no revision was provided",
                self.threshold
            )));
        }

        // An unsolicited revision at or above the threshold is dropped so the
        // final artifact rule stays a single condition.
        let revised = if alignment_score >= self.threshold {
            None
        } else {
            revised
        };

        Ok(StageOutput::Qa(QaReport {
            alignment_score,
            strengths: raw.strengths,
            improvement_suggestions: raw.improvement_suggestions,
            assessment: raw.assessment,
            revised,
        }))
    }
}
