//! Pipeline orchestrator
//!
//! Drives one run through the four stages in order, with per-stage retry,
//! timeout, and cancellation. The workflow state is the single source of
//! truth: every stage outcome lands in its log before the run moves on.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use gateway::{GatewayError, LlmGateway};

use crate::agents::{
    CreativeAgent, PersonaAgent, QaAgent, StageAgent, StageError, StageOutput, StrategyAgent,
};
use crate::analytics::{summarize, RunSummary};
use crate::config::OrchestratorConfig;
use crate::persona::PersonaStore;
use crate::request::ContentRequest;
use crate::retry::run_with_retry;
use crate::runlog::{RunLogStore, RunRecord};
use crate::state::{DraftContent, RunStatus, Stage, StageLogEntry, StageStatus, WorkflowState};

/// Cooperative cancellation flag, checked at stage boundaries. A stage
/// already in flight finishes its call, but its result is discarded.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Terminal failure of a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("unknown persona: {0}")]
    UnknownPersona(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("run cancelled at the {stage} stage")]
    Cancelled { stage: Stage },

    #[error("{stage} stage failed after {attempts} attempt(s): {source}")]
    Stage {
        stage: Stage,
        attempts: u32,
        #[source]
        source: StageError,
    },
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub state: WorkflowState,
    pub artifact: DraftContent,
    pub summary: RunSummary,
}

pub struct Orchestrator {
    gateway: Arc<dyn LlmGateway>,
    personas: Arc<dyn PersonaStore>,
    config: OrchestratorConfig,
    run_log: Option<RunLogStore>,
}

impl Orchestrator {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        personas: Arc<dyn PersonaStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            gateway,
            personas,
            config,
            run_log: None,
        }
    }

    /// Persist finished runs to the given store.
    pub fn with_run_log(mut self, store: RunLogStore) -> Self {
        self.run_log = Some(store);
        self
    }

    fn agents(&self) -> [Box<dyn StageAgent>; 4] {
        [
            Box::new(PersonaAgent::new()),
            Box::new(StrategyAgent::new()),
            Box::new(CreativeAgent::new()),
            Box::new(QaAgent::new(self.config.qa_revision_threshold)),
        ]
    }

    /// Execute one content generation run end to end.
    pub async fn generate(
        &self,
        request: ContentRequest,
        cancel: &CancelToken,
    ) -> Result<RunReport, RunError> {
        request.validate().map_err(RunError::Validation)?;
        let persona = self
            .personas
            .get(&request.persona_id)
            .ok_or_else(|| RunError::UnknownPersona(request.persona_id.clone()))?;

        let mut state = WorkflowState::new(request, persona);
        tracing::info!(
            run_id = %state.run_id,
            persona = %state.persona.id,
            content_type = state.request.content_type.name(),
            "starting content run"
        );

        let result = self.run_pipeline(&mut state, cancel).await;
        let summary = summarize(&state);

        if let Some(store) = &self.run_log {
            let error = result.as_ref().err().map(|e| e.to_string());
            if let Err(e) = store.write(&RunRecord::from_state(&state, error)) {
                tracing::warn!(run_id = %state.run_id, "failed to persist run record: {e:#}");
            }
        }

        result?;

        let artifact = match state.final_artifact() {
            Some(artifact) => artifact.clone(),
            // Completion without a draft would mean a stage ran out of order.
            None => unreachable!("completed run has no draft content"),
        };

        tracing::info!(
            run_id = %state.run_id,
            tokens = summary.total_estimated_tokens,
            score = summary.alignment_score,
            "run completed"
        );

        Ok(RunReport {
            state,
            artifact,
            summary,
        })
    }

    /// Run the four stages against an already-initialized state. Seals the
    /// state as COMPLETED or FAILED before returning.
    pub async fn run_pipeline(
        &self,
        state: &mut WorkflowState,
        cancel: &CancelToken,
    ) -> Result<(), RunError> {
        state.status = RunStatus::Running;

        let policy = self.config.retry_policy();
        let stage_timeout = self.config.stage_timeout();

        for agent in self.agents() {
            let stage = agent.stage();
            if cancel.is_cancelled() {
                state.seal(RunStatus::Failed);
                return Err(RunError::Cancelled { stage });
            }

            let started_at = Utc::now();
            let (result, attempts) = {
                let agent = agent.as_ref();
                let gateway = self.gateway.as_ref();
                let state_ref: &WorkflowState = state;
                run_with_retry(&policy, || async move {
                    match tokio::time::timeout(stage_timeout, agent.run(state_ref, gateway)).await
                    {
                        Ok(result) => result,
                        Err(_) => Err(StageError::Gateway(GatewayError::Timeout)),
                    }
                })
                .await
            };
            let finished_at = Utc::now();

            // A cancellation raised mid-stage discards the stage result.
            if cancel.is_cancelled() {
                state.seal(RunStatus::Failed);
                return Err(RunError::Cancelled { stage });
            }

            match result {
                Ok(success) => {
                    state.record_stage(StageLogEntry {
                        stage,
                        started_at,
                        finished_at,
                        status: StageStatus::Success,
                        attempts,
                        estimated_tokens: success.estimated_tokens,
                        error: None,
                        error_kind: None,
                    });
                    apply_output(state, success.output);
                    tracing::debug!(run_id = %state.run_id, %stage, attempts, "stage succeeded");
                }
                Err(e) => {
                    tracing::error!(run_id = %state.run_id, %stage, attempts, error = %e, "stage failed");
                    state.record_stage(StageLogEntry {
                        stage,
                        started_at,
                        finished_at,
                        status: StageStatus::Failed,
                        attempts,
                        estimated_tokens: 0,
                        error: Some(e.to_string()),
                        error_kind: Some(e.kind().to_string()),
                    });
                    state.seal(RunStatus::Failed);
                    return Err(RunError::Stage {
                        stage,
                        attempts,
                        source: e,
                    });
                }
            }
        }

        state.seal(RunStatus::Completed);
        Ok(())
    }
}

fn apply_output(state: &mut WorkflowState, output: StageOutput) {
    match output {
        StageOutput::Persona(insights) => state.persona_insights = Some(insights),
        StageOutput::Strategy(strategy) => state.strategy = Some(strategy),
        StageOutput::Creative(draft) => state.draft_content = Some(draft),
        StageOutput::Qa(report) => state.qa_result = Some(report),
    }
}
