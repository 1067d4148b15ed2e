//! End-to-end pipeline tests against a scripted gateway

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use orchestrator::{
    summarize, CancelToken, ContentRequest, ContentType, GatewayError, GenerationParams,
    InMemoryPersonaStore, LlmGateway, Orchestrator, OrchestratorConfig, PersonaStore, RunError,
    RunLogStore, RunStatus, Stage, StageError, StageStatus, ToneStyle, WorkflowState,
};

/// Gateway that replays a fixed script of responses.
struct ScriptedGateway {
    responses: Mutex<VecDeque<Result<String, GatewayError>>>,
    /// When set, cancelled during the invoke whose index matches
    cancel_on_call: Option<(usize, CancelToken)>,
    calls: Mutex<usize>,
}

impl ScriptedGateway {
    fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            cancel_on_call: None,
            calls: Mutex::new(0),
        }
    }

    fn cancelling_on(mut self, call: usize, token: CancelToken) -> Self {
        self.cancel_on_call = Some((call, token));
        self
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn invoke(
        &self,
        _prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, GatewayError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if let Some((cancel_call, token)) = &self.cancel_on_call {
            if call == *cancel_call {
                token.cancel();
            }
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GatewayError::ProviderUnavailable(
                "script exhausted".to_string(),
            )))
    }
}

/// Gateway that never answers within a stage timeout.
struct StalledGateway;

#[async_trait]
impl LlmGateway for StalledGateway {
    async fn invoke(
        &self,
        _prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, GatewayError> {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Ok("too late".to_string())
    }
}

fn persona_json() -> Result<String, GatewayError> {
    Ok(r#"{
        "summary": "Budget-conscious tech founder chasing traction",
        "key_insights": ["values speed", "skeptical of hype"],
        "pain_point_focus": ["Limited marketing budget"],
        "content_angles": ["scrappy growth"],
        "motivation_triggers": ["measurable results"]
    }"#
    .to_string())
}

fn strategy_json() -> Result<String, GatewayError> {
    Ok(r#"{
        "funnel_stage": "awareness",
        "recommended_angle": "practical wins",
        "key_messages": ["start small", "measure everything"],
        "cta": {"kind": "learn_more", "placement": "end", "message": "Read the full playbook"},
        "engagement_hooks": ["open with a stat"],
        "value_proposition": "growth without a budget"
    }"#
    .to_string())
}

fn creative_json() -> Result<String, GatewayError> {
    Ok(r#"{
        "title": "Scrappy Growth for Founders",
        "body": "Start with one channel. Measure it. Double down on what works.",
        "call_to_action": "Read the full playbook",
        "meta_description": "Practical growth tactics for early-stage founders",
        "tags": ["growth", "startups"]
    }"#
    .to_string())
}

fn qa_json(score: u8) -> Result<String, GatewayError> {
    Ok(format!(
        r#"{{
            "alignment_score": {score},
            "strengths": ["fits the persona"],
            "improvement_suggestions": [],
            "assessment": "good",
            "revised": null
        }}"#
    ))
}

fn qa_json_with_revision(score: u8) -> Result<String, GatewayError> {
    Ok(format!(
        r#"{{
            "alignment_score": {score},
            "strengths": [],
            "improvement_suggestions": ["sharpen the hook"],
            "assessment": "needs work",
            "revised": {{
                "title": "Scrappy Growth, Revised",
                "body": "One channel. One metric. Relentless focus.",
                "call_to_action": "Read the full playbook",
                "tags": ["growth"]
            }}
        }}"#
    ))
}

fn fast_config() -> OrchestratorConfig {
    OrchestratorConfig {
        backoff_base_ms: 1,
        backoff_cap_ms: 4,
        ..OrchestratorConfig::default()
    }
}

fn orchestrator(gateway: ScriptedGateway, config: OrchestratorConfig) -> Orchestrator {
    Orchestrator::new(
        Arc::new(gateway),
        Arc::new(InMemoryPersonaStore::with_defaults()),
        config,
    )
}

fn blog_request() -> ContentRequest {
    ContentRequest {
        content_type: ContentType::BlogPost,
        platform: "website".to_string(),
        tone: ToneStyle::Professional,
        persona_id: "startup_founder_tech".to_string(),
        topic: "Growing without a marketing budget".to_string(),
        context: None,
        keywords: vec!["growth".to_string()],
        length: None,
        include_cta: true,
    }
}

#[tokio::test]
async fn happy_path_completes_with_four_ordered_stages() {
    let gateway = ScriptedGateway::new(vec![
        persona_json(),
        strategy_json(),
        creative_json(),
        qa_json(85),
    ]);
    let orchestrator = orchestrator(gateway, fast_config());

    let report = orchestrator
        .generate(blog_request(), &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(report.state.status, RunStatus::Completed);
    let stages: Vec<_> = report.state.stage_log.iter().map(|e| e.stage).collect();
    assert_eq!(
        stages,
        vec![Stage::Persona, Stage::Strategy, Stage::Creative, Stage::Qa]
    );
    assert!(report
        .state
        .stage_log
        .iter()
        .all(|e| e.status == StageStatus::Success && e.attempts == 1));

    // Output fields are populated exactly where the log records success.
    for stage in Stage::ORDER {
        assert!(report.state.stage_succeeded(stage));
    }
    assert!(report.state.persona_insights.is_some());
    assert!(report.state.strategy.is_some());
    assert!(report.state.draft_content.is_some());
    assert!(report.state.qa_result.is_some());

    // No revision at score 85, so the artifact is the original draft.
    assert_eq!(report.artifact.title.as_deref(), Some("Scrappy Growth for Founders"));
    assert_eq!(report.summary.stages_completed, 4);
    assert_eq!(report.summary.alignment_score, Some(85));
    assert!(report.summary.total_estimated_tokens > 0);
}

#[tokio::test]
async fn strategy_parse_failure_fails_the_run_without_retry() {
    let gateway = ScriptedGateway::new(vec![
        persona_json(),
        Ok("I cannot answer in JSON today.".to_string()),
    ]);
    let orchestrator = orchestrator(gateway, fast_config());
    let personas = InMemoryPersonaStore::with_defaults();
    let persona = personas.get("startup_founder_tech").unwrap();

    let mut state = WorkflowState::new(blog_request(), persona);
    let err = orchestrator
        .run_pipeline(&mut state, &CancelToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RunError::Stage {
            stage: Stage::Strategy,
            attempts: 1,
            ..
        }
    ));
    assert_eq!(state.status, RunStatus::Failed);
    assert_eq!(state.stage_log.len(), 2);
    assert_eq!(state.stage_log[0].status, StageStatus::Success);
    assert_eq!(state.stage_log[1].status, StageStatus::Failed);
    assert!(state.stage_log[1].error.is_some());
    assert_eq!(state.stage_log[1].error_kind.as_deref(), Some("parse_error"));
    assert!(state.stage_succeeded(Stage::Persona));
    assert!(!state.stage_succeeded(Stage::Strategy));

    // Nothing past the failed stage was populated.
    assert!(state.persona_insights.is_some());
    assert!(state.strategy.is_none());
    assert!(state.draft_content.is_none());
    assert!(state.qa_result.is_none());
}

#[tokio::test]
async fn transient_failures_are_retried_within_the_stage() {
    let gateway = ScriptedGateway::new(vec![
        Err(GatewayError::RateLimited),
        Err(GatewayError::RateLimited),
        persona_json(),
        strategy_json(),
        creative_json(),
        qa_json(90),
    ]);
    let orchestrator = orchestrator(gateway, fast_config());

    let report = orchestrator
        .generate(blog_request(), &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(report.state.status, RunStatus::Completed);
    assert_eq!(report.state.stage_log[0].attempts, 3);
    assert_eq!(report.state.stage_log[1].attempts, 1);
}

#[tokio::test(start_paused = true)]
async fn stalled_stage_times_out_retries_then_fails() {
    let config = OrchestratorConfig {
        stage_timeout_secs: 1,
        max_attempts: 2,
        backoff_base_ms: 1,
        backoff_cap_ms: 2,
        ..OrchestratorConfig::default()
    };
    let orchestrator = Orchestrator::new(
        Arc::new(StalledGateway),
        Arc::new(InMemoryPersonaStore::with_defaults()),
        config,
    );
    let personas = InMemoryPersonaStore::with_defaults();
    let persona = personas.get("startup_founder_tech").unwrap();

    let mut state = WorkflowState::new(blog_request(), persona);
    let err = orchestrator
        .run_pipeline(&mut state, &CancelToken::new())
        .await
        .unwrap_err();

    match err {
        RunError::Stage {
            stage,
            attempts,
            source,
        } => {
            assert_eq!(stage, Stage::Persona);
            assert_eq!(attempts, 2);
            assert!(matches!(source, StageError::Gateway(GatewayError::Timeout)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(state.status, RunStatus::Failed);
    assert_eq!(state.stage_log.len(), 1);
    assert_eq!(state.stage_log[0].error_kind.as_deref(), Some("timeout"));
}

#[tokio::test]
async fn exhausted_retries_fail_the_stage() {
    let gateway = ScriptedGateway::new(vec![
        Err(GatewayError::RateLimited),
        Err(GatewayError::RateLimited),
        Err(GatewayError::RateLimited),
    ]);
    let orchestrator = orchestrator(gateway, fast_config());

    let err = orchestrator
        .generate(blog_request(), &CancelToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RunError::Stage {
            stage: Stage::Persona,
            attempts: 3,
            ..
        }
    ));
}

#[tokio::test]
async fn low_qa_score_swaps_in_the_revision() {
    let gateway = ScriptedGateway::new(vec![
        persona_json(),
        strategy_json(),
        creative_json(),
        qa_json_with_revision(60),
    ]);
    let orchestrator = orchestrator(gateway, fast_config());

    let report = orchestrator
        .generate(blog_request(), &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(report.artifact.title.as_deref(), Some("Scrappy Growth, Revised"));
    assert_eq!(report.summary.alignment_score, Some(60));
    // The original draft stays in the state for inspection.
    assert_eq!(
        report.state.draft_content.unwrap().title.as_deref(),
        Some("Scrappy Growth for Founders")
    );
}

#[tokio::test]
async fn qa_below_threshold_without_revision_fails_the_run() {
    let gateway = ScriptedGateway::new(vec![
        persona_json(),
        strategy_json(),
        creative_json(),
        qa_json(40),
    ]);
    let orchestrator = orchestrator(gateway, fast_config());

    let err = orchestrator
        .generate(blog_request(), &CancelToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, RunError::Stage { stage: Stage::Qa, .. }));
}

#[tokio::test]
async fn social_media_post_needs_no_title() {
    let gateway = ScriptedGateway::new(vec![
        persona_json(),
        strategy_json(),
        Ok(r#"{"body": "Launching today. One channel, one metric, relentless focus.", "tags": ["launch"]}"#.to_string()),
        qa_json(80),
    ]);
    let orchestrator = orchestrator(gateway, fast_config());

    let mut request = blog_request();
    request.content_type = ContentType::SocialMedia;
    request.platform = "twitter".to_string();

    let report = orchestrator
        .generate(request, &CancelToken::new())
        .await
        .unwrap();

    assert!(report.artifact.title.is_none());
    assert!(report.artifact.body.len() <= 280);
}

#[tokio::test]
async fn cancellation_mid_run_discards_the_inflight_stage() {
    let cancel = CancelToken::new();
    let gateway = ScriptedGateway::new(vec![persona_json(), strategy_json()])
        .cancelling_on(2, cancel.clone());
    let orchestrator = orchestrator(gateway, fast_config());
    let personas = InMemoryPersonaStore::with_defaults();
    let persona = personas.get("startup_founder_tech").unwrap();

    let mut state = WorkflowState::new(blog_request(), persona);
    let err = orchestrator.run_pipeline(&mut state, &cancel).await.unwrap_err();

    assert!(matches!(
        err,
        RunError::Cancelled {
            stage: Stage::Strategy
        }
    ));
    assert_eq!(state.status, RunStatus::Failed);
    // The strategy result existed but was discarded, not applied.
    assert!(state.strategy.is_none());
}

#[tokio::test]
async fn finished_runs_are_persisted_to_the_run_log() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = ScriptedGateway::new(vec![
        persona_json(),
        strategy_json(),
        creative_json(),
        qa_json(85),
    ]);
    let orchestrator =
        orchestrator(gateway, fast_config()).with_run_log(RunLogStore::new(dir.path()));

    let report = orchestrator
        .generate(blog_request(), &CancelToken::new())
        .await
        .unwrap();

    let store = RunLogStore::new(dir.path());
    let record = store.load(&report.state.run_id).unwrap();
    assert_eq!(record.status, RunStatus::Completed);
    assert_eq!(record.stage_log.len(), 4);
    assert!(record.artifact.is_some());
    assert!(record.error.is_none());
}

#[tokio::test]
async fn summaries_are_stable_for_a_sealed_state() {
    let gateway = ScriptedGateway::new(vec![
        persona_json(),
        strategy_json(),
        creative_json(),
        qa_json(85),
    ]);
    let orchestrator = orchestrator(gateway, fast_config());

    let report = orchestrator
        .generate(blog_request(), &CancelToken::new())
        .await
        .unwrap();

    let again = summarize(&report.state);
    assert_eq!(again.total_estimated_tokens, report.summary.total_estimated_tokens);
    assert_eq!(again.total_duration_ms, report.summary.total_duration_ms);
    assert_eq!(again.stages_completed, report.summary.stages_completed);
    assert_eq!(again.estimated_cost, report.summary.estimated_cost);
}
