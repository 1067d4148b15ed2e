//! Run analytics
//!
//! Pure aggregation over a sealed workflow state. Summarizing never mutates
//! the state, so repeated calls give identical results.

use serde::{Deserialize, Serialize};

use crate::state::{RunStatus, Stage, StageStatus, WorkflowState};

/// Estimated cost per token, in USD.
const COST_PER_TOKEN: f64 = 0.0001;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageSummary {
    pub stage: Stage,
    pub status: StageStatus,
    pub duration_ms: u64,
    pub attempts: u32,
    pub estimated_tokens: u64,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub status: RunStatus,

    /// Span from the first stage start to the last stage finish
    pub total_duration_ms: u64,

    pub stages: Vec<StageSummary>,
    pub stages_completed: usize,

    pub total_estimated_tokens: u64,
    pub estimated_cost: f64,

    /// QA alignment score, when the run got that far
    #[serde(default)]
    pub alignment_score: Option<u8>,
}

/// Aggregate a run's stage log into a summary.
pub fn summarize(state: &WorkflowState) -> RunSummary {
    let stages: Vec<StageSummary> = state
        .stage_log
        .iter()
        .map(|entry| StageSummary {
            stage: entry.stage,
            status: entry.status,
            duration_ms: entry.duration_ms(),
            attempts: entry.attempts,
            estimated_tokens: entry.estimated_tokens,
            error: entry.error.clone(),
            error_kind: entry.error_kind.clone(),
        })
        .collect();

    let total_duration_ms = match (state.stage_log.first(), state.stage_log.last()) {
        (Some(first), Some(last)) => (last.finished_at - first.started_at)
            .num_milliseconds()
            .max(0) as u64,
        _ => 0,
    };

    let total_estimated_tokens: u64 = stages.iter().map(|s| s.estimated_tokens).sum();
    let stages_completed = stages
        .iter()
        .filter(|s| s.status == StageStatus::Success)
        .count();

    RunSummary {
        run_id: state.run_id.clone(),
        status: state.status,
        total_duration_ms,
        stages,
        stages_completed,
        total_estimated_tokens,
        estimated_cost: total_estimated_tokens as f64 * COST_PER_TOKEN,
        alignment_score: state.qa_result.as_ref().map(|qa| qa.alignment_score),
    }
}
