//! Creative generation agent — third stage
//!
//! The only stage allowed a non-JSON fallback: a draft that arrives as plain
//! text is still usable content, so it is converted rather than rejected.

use gateway::{GenerationParams, ModelClass};
use serde::Deserialize;

use crate::prompts::CREATIVE_PROMPT;
use crate::state::{DraftContent, Stage, WorkflowState};

use super::extract::extract_json;
use super::{persona_section, request_section, require_output, StageAgent, StageError, StageOutput};

/// Produces the platform-optimized draft. Requires persona insights and the
/// content strategy, and runs hot on the creative model class.
#[derive(Debug, Default)]
pub struct CreativeAgent;

impl CreativeAgent {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Deserialize)]
struct RawDraft {
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
    #[serde(default)]
    word_count: Option<usize>,
}

impl StageAgent for CreativeAgent {
    fn stage(&self) -> Stage {
        Stage::Creative
    }

    fn params(&self) -> GenerationParams {
        GenerationParams::new(ModelClass::Creative, 2048, 0.7)
    }

    fn build_prompt(&self, state: &WorkflowState) -> String {
        let insights = require_output(&state.persona_insights, Stage::Creative, "persona insights");
        let strategy = require_output(&state.strategy, Stage::Creative, "content strategy");

        let insights_section = format!(
            "PERSONA INSIGHTS:\n- Summary: {}\n- Pain point focus: {}\n- Content angles: {}\n",
            insights.summary,
            insights.pain_point_focus.join("; "),
            insights.content_angles.join("; ")
        );

        let mut strategy_section = format!(
            "CONTENT STRATEGY:\n- Funnel stage: {}\n- Key messages: {}\n- Recommended angle: {}\n- CTA: {} ({})\n",
            strategy.funnel_stage.name(),
            strategy.key_messages.join("; "),
            strategy.recommended_angle,
            strategy.cta.message,
            strategy.cta.kind
        );
        if !strategy.engagement_hooks.is_empty() {
            strategy_section.push_str(&format!(
                "- Engagement hooks: {}\n",
                strategy.engagement_hooks.join("; ")
            ));
        }
        if let Some(value) = &strategy.value_proposition {
            strategy_section.push_str(&format!("- Value proposition: {value}\n"));
        }

        format!(
            "{}\n{}\n{}\n{}\nFORMAT GUIDANCE: {}\n\n{}",
            persona_section(&state.persona),
            request_section(&state.request),
            insights_section,
            strategy_section,
            state.request.content_type.format_guidance(),
            CREATIVE_PROMPT
        )
    }

    fn parse(&self, response: &str, state: &WorkflowState) -> Result<StageOutput, StageError> {
        let raw = match extract_json(response).and_then(|json| {
            serde_json::from_str::<RawDraft>(json).ok()
        }) {
            Some(raw) => raw,
            None => draft_from_text(response, state),
        };

        let body = raw.body.trim();
        if body.is_empty() {
            return Err(StageError::Parse(
                "creative draft has an empty body".to_string(),
            ));
        }

        let request = &state.request;
        let title = raw.title.filter(|t| !t.trim().is_empty());
        if request.content_type.requires_title() && title.is_none() {
            return Err(StageError::Parse(format!(
                "creative draft for {} is missing a title",
                request.content_type.name()
            )));
        }

        let call_to_action = raw.call_to_action.filter(|c| !c.trim().is_empty());
        if request.content_type.requires_cta(request.include_cta) && call_to_action.is_none() {
            return Err(StageError::Parse(
                "creative draft is missing the requested call to action".to_string(),
            ));
        }

        let mut draft = DraftContent {
            title,
            body: body.to_string(),
            call_to_action,
            meta_description: raw.meta_description.filter(|m| !m.trim().is_empty()),
            tags: raw.tags,
            word_count: 0,
        };
        draft.word_count = raw
            .word_count
            .filter(|&w| w > 0)
            .unwrap_or_else(|| draft.computed_word_count());

        Ok(StageOutput::Creative(draft))
    }
}

/// Salvage a plain-text draft the model produced instead of JSON.
///
/// A leading markdown heading becomes the title; the CTA falls back to the
/// strategy plan; tags come from the request keywords.
fn draft_from_text(text: &str, state: &WorkflowState) -> RawDraft {
    let trimmed = text.trim();

    let mut title = None;
    let mut body = trimmed.to_string();
    if let Some(first_line) = trimmed.lines().next() {
        if let Some(heading) = first_line.strip_prefix('#') {
            title = Some(heading.trim_start_matches('#').trim().to_string());
            body = trimmed[first_line.len()..].trim().to_string();
        }
    }

    let call_to_action = if state.request.include_cta {
        state.strategy.as_ref().map(|s| s.cta.message.clone())
    } else {
        None
    };

    let mut tags = state.request.keywords.clone();
    if tags.is_empty() {
        tags = state
            .request
            .topic
            .split_whitespace()
            .filter(|w| w.len() > 4)
            .take(3)
            .map(|w| w.to_ascii_lowercase())
            .collect();
    }

    RawDraft {
        title,
        body,
        call_to_action,
        meta_description: None,
        tags,
        word_count: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::builtin_personas;
    use crate::request::{ContentRequest, ContentType, ToneStyle};
    use crate::state::{ContentStrategy, CtaPlan, FunnelStage, PersonaInsights};

    fn state(content_type: ContentType, include_cta: bool) -> WorkflowState {
        let request = ContentRequest {
            content_type,
            platform: "blog".to_string(),
            tone: ToneStyle::Professional,
            persona_id: "startup_founder_tech".to_string(),
            topic: "Validating a startup idea".to_string(),
            context: None,
            keywords: vec!["validation".to_string()],
            length: None,
            include_cta,
        };
        let mut state = WorkflowState::new(request, builtin_personas().remove(0));
        state.persona_insights = Some(PersonaInsights {
            summary: "s".to_string(),
            key_insights: vec!["k".to_string()],
            pain_point_focus: vec!["p".to_string()],
            content_angles: vec![],
            motivation_triggers: vec![],
            language_preferences: None,
        });
        state.strategy = Some(ContentStrategy {
            funnel_stage: FunnelStage::Awareness,
            key_messages: vec!["m".to_string()],
            recommended_angle: "angle".to_string(),
            cta: CtaPlan {
                kind: "signup".to_string(),
                placement: None,
                message: "Start your free trial".to_string(),
            },
            engagement_hooks: vec![],
            value_proposition: None,
        });
        state
    }

    #[test]
    fn parses_json_draft_and_computes_word_count() {
        let state = state(ContentType::BlogPost, true);
        let response = r#"{
            "title": "Five Ways to Validate",
            "body": "one two three four",
            "call_to_action": "act now",
            "meta_description": "meta",
            "tags": ["validation"]
        }"#;
        let output = CreativeAgent::new().parse(response, &state).unwrap();
        match output {
            StageOutput::Creative(draft) => {
                assert_eq!(draft.title.as_deref(), Some("Five Ways to Validate"));
                assert_eq!(draft.word_count, 6);
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn plain_text_falls_back_instead_of_failing() {
        let state = state(ContentType::BlogPost, true);
        let response = "# Validate Before You Build\n\nTalk to ten customers first.\nThen build.";
        let output = CreativeAgent::new().parse(response, &state).unwrap();
        match output {
            StageOutput::Creative(draft) => {
                assert_eq!(draft.title.as_deref(), Some("Validate Before You Build"));
                assert!(draft.body.starts_with("Talk to ten customers"));
                assert_eq!(draft.call_to_action.as_deref(), Some("Start your free trial"));
                assert_eq!(draft.tags, vec!["validation"]);
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn social_media_needs_no_title() {
        let state = state(ContentType::SocialMedia, true);
        let response = r#"{"body": "short post"}"#;
        let output = CreativeAgent::new().parse(response, &state).unwrap();
        match output {
            StageOutput::Creative(draft) => assert!(draft.title.is_none()),
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn missing_title_for_blog_post_is_parse_error() {
        let state = state(ContentType::BlogPost, false);
        let response = r#"{"body": "content without a title"}"#;
        assert!(matches!(
            CreativeAgent::new().parse(response, &state),
            Err(StageError::Parse(_))
        ));
    }

    #[test]
    fn ad_copy_never_requires_a_cta() {
        let state = state(ContentType::AdCopy, true);
        let response = r#"{"title": "T", "body": "punchy ad text"}"#;
        assert!(CreativeAgent::new().parse(response, &state).is_ok());
    }

    #[test]
    fn missing_cta_when_requested_is_parse_error() {
        let state = state(ContentType::EmailCampaign, true);
        let response = r#"{"title": "T", "body": "content"}"#;
        assert!(matches!(
            CreativeAgent::new().parse(response, &state),
            Err(StageError::Parse(_))
        ));
    }

    #[test]
    fn empty_body_is_parse_error_even_via_fallback() {
        let state = state(ContentType::SocialMedia, false);
        assert!(matches!(
            CreativeAgent::new().parse("   ", &state),
            Err(StageError::Parse(_))
        ));
    }

    #[test]
    #[should_panic(expected = "creative agent invoked before content strategy was populated")]
    fn prompt_without_strategy_panics() {
        let mut state = state(ContentType::BlogPost, true);
        state.strategy = None;
        CreativeAgent::new().build_prompt(&state);
    }

    #[test]
    fn uses_creative_model() {
        let params = CreativeAgent::new().params();
        assert_eq!(params.model_class, ModelClass::Creative);
        assert!((params.temperature - 0.7).abs() < f32::EPSILON);
    }
}
