//! Persona-targeted content generation pipeline
//!
//! This crate provides:
//! - A fixed four-stage agent pipeline (persona analysis, strategy planning,
//!   creative generation, quality assurance) over a shared workflow state
//! - The orchestrator state machine with per-stage retry, backoff, timeout
//!   and cooperative cancellation
//! - Analytics summarizing a completed or failed run
//! - Persona store and persisted run records
//!
//! # Example
//!
//! ```rust,ignore
//! use orchestrator::{CancelToken, Orchestrator};
//!
//! let orchestrator = Orchestrator::new(gateway, personas, config);
//! let report = orchestrator.generate(request, &CancelToken::new()).await?;
//! println!("{}", report.artifact.body);
//! ```

pub mod agents;
pub mod analytics;
pub mod config;
pub mod engine;
pub mod persona;
pub mod prompts;
pub mod request;
pub mod retry;
pub mod runlog;
pub mod state;

pub use agents::{StageAgent, StageError, StageOutput, StageSuccess};
pub use analytics::{summarize, RunSummary, StageSummary};
pub use config::{AppConfig, OrchestratorConfig};
pub use engine::{CancelToken, Orchestrator, RunError, RunReport};
pub use persona::{InMemoryPersonaStore, Persona, PersonaStore};
pub use request::{ContentLength, ContentRequest, ContentType, ToneStyle};
pub use runlog::{RunLogStore, RunRecord};
pub use state::{
    ContentStrategy, CtaPlan, DraftContent, FunnelStage, PersonaInsights, QaReport, RunStatus,
    Stage, StageLogEntry, StageStatus, WorkflowState,
};

/// Re-export the gateway boundary types used by callers
pub use gateway::{GatewayConfig, GatewayError, GenerationParams, GroqGateway, LlmGateway, ModelClass};
