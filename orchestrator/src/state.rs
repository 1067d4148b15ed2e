//! Workflow state shared across the four pipeline stages
//!
//! One `WorkflowState` accumulates the outputs of each stage in order.
//! An output field is populated if and only if the stage log records that
//! stage as successful.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persona::Persona;
use crate::request::ContentRequest;

/// The four pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Persona,
    Strategy,
    Creative,
    Qa,
}

impl Stage {
    pub const ORDER: [Stage; 4] = [Stage::Persona, Stage::Strategy, Stage::Creative, Stage::Qa];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Persona => "persona",
            Self::Strategy => "strategy",
            Self::Creative => "creative",
            Self::Qa => "qa",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Outcome of one stage execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Success,
    Failed,
}

/// One entry in the append-only stage log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageLogEntry {
    pub stage: Stage,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub status: StageStatus,

    /// Attempts made including the final one
    pub attempts: u32,

    /// Rough prompt + completion token estimate
    pub estimated_tokens: u64,

    /// Error detail when the stage failed
    #[serde(default)]
    pub error: Option<String>,

    /// Machine-readable failure kind, e.g. "rate_limited" or "parse_error"
    #[serde(default)]
    pub error_kind: Option<String>,
}

impl StageLogEntry {
    pub fn duration_ms(&self) -> u64 {
        (self.finished_at - self.started_at).num_milliseconds().max(0) as u64
    }
}

/// Output of the persona analysis stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaInsights {
    /// Demographic and behavioral summary
    pub summary: String,

    pub key_insights: Vec<String>,

    /// Pain points ranked by relevance to the brief. When the model does
    /// not rank them, this is the persona's own ordered list.
    pub pain_point_focus: Vec<String>,

    /// Messaging angles for later stages
    #[serde(default)]
    pub content_angles: Vec<String>,

    #[serde(default)]
    pub motivation_triggers: Vec<String>,

    #[serde(default)]
    pub language_preferences: Option<String>,
}

/// Marketing funnel stage assigned by the strategy agent. Closed set; any
/// other value from the model is a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    Awareness,
    Consideration,
    Decision,
    Retention,
}

impl FunnelStage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Awareness => "awareness",
            Self::Consideration => "consideration",
            Self::Decision => "decision",
            Self::Retention => "retention",
        }
    }
}

impl std::str::FromStr for FunnelStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "awareness" => Ok(Self::Awareness),
            "consideration" => Ok(Self::Consideration),
            "decision" => Ok(Self::Decision),
            "retention" => Ok(Self::Retention),
            other => Err(format!("unknown funnel stage: {other:?}")),
        }
    }
}

/// Call-to-action recommendation from the strategy agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtaPlan {
    /// e.g. "learn_more", "signup", "purchase"
    pub kind: String,

    #[serde(default)]
    pub placement: Option<String>,

    /// Suggested CTA text
    pub message: String,
}

impl Default for CtaPlan {
    fn default() -> Self {
        Self {
            kind: "learn_more".to_string(),
            placement: Some("end of content".to_string()),
            message: "Learn more about solving this challenge.".to_string(),
        }
    }
}

/// Output of the strategy planning stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentStrategy {
    pub funnel_stage: FunnelStage,

    pub key_messages: Vec<String>,

    /// Recommended content angle / positioning notes
    #[serde(default)]
    pub recommended_angle: String,

    pub cta: CtaPlan,

    #[serde(default)]
    pub engagement_hooks: Vec<String>,

    #[serde(default)]
    pub value_proposition: Option<String>,
}

/// Output of the creative generation stage (and shape of QA revisions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftContent {
    #[serde(default)]
    pub title: Option<String>,

    pub body: String,

    #[serde(default)]
    pub call_to_action: Option<String>,

    #[serde(default)]
    pub meta_description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    pub word_count: usize,
}

impl DraftContent {
    /// Body plus CTA word count, used when the model does not report one.
    pub fn computed_word_count(&self) -> usize {
        let cta_words = self
            .call_to_action
            .as_deref()
            .map(|c| c.split_whitespace().count())
            .unwrap_or(0);
        self.body.split_whitespace().count() + cta_words
    }
}

/// Output of the quality assurance stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaReport {
    /// How well the content matches persona and strategy, 0-100
    pub alignment_score: u8,

    #[serde(default)]
    pub strengths: Vec<String>,

    #[serde(default)]
    pub improvement_suggestions: Vec<String>,

    #[serde(default)]
    pub assessment: Option<String>,

    /// Present when the score fell below the configured threshold
    #[serde(default)]
    pub revised: Option<DraftContent>,
}

/// The central accumulator for one run.
///
/// Created by the orchestrator, mutated in place by each stage in turn,
/// sealed at run end, then read-only for analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    pub run_id: String,
    pub request: ContentRequest,
    pub persona: Persona,

    pub persona_insights: Option<PersonaInsights>,
    pub strategy: Option<ContentStrategy>,
    pub draft_content: Option<DraftContent>,
    pub qa_result: Option<QaReport>,

    pub stage_log: Vec<StageLogEntry>,
    pub status: RunStatus,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl WorkflowState {
    pub fn new(request: ContentRequest, persona: Persona) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            request,
            persona,
            persona_insights: None,
            strategy: None,
            draft_content: None,
            qa_result: None,
            stage_log: Vec::new(),
            status: RunStatus::Pending,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Append a stage log entry. The log is append-only.
    pub fn record_stage(&mut self, entry: StageLogEntry) {
        self.stage_log.push(entry);
    }

    /// Set the final status and close the run.
    pub fn seal(&mut self, status: RunStatus) {
        self.status = status;
        self.finished_at = Some(Utc::now());
    }

    /// Whether the log records this stage as successful.
    pub fn stage_succeeded(&self, stage: Stage) -> bool {
        self.stage_log
            .iter()
            .any(|e| e.stage == stage && e.status == StageStatus::Success)
    }

    /// The deliverable of a completed run: the QA revision when one exists,
    /// the original draft otherwise.
    pub fn final_artifact(&self) -> Option<&DraftContent> {
        self.qa_result
            .as_ref()
            .and_then(|qa| qa.revised.as_ref())
            .or(self.draft_content.as_ref())
    }
}
