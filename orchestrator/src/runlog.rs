//! Persistent run history
//!
//! Each finished run is written as one JSON file under the run log
//! directory, named by run id.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::state::{DraftContent, RunStatus, StageLogEntry, WorkflowState};

/// Everything worth keeping about one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub created_at: DateTime<Utc>,
    pub persona_id: String,
    pub content_type: String,
    pub platform: String,
    pub topic: String,
    pub status: RunStatus,
    pub stage_log: Vec<StageLogEntry>,

    /// Final deliverable for completed runs
    #[serde(default)]
    pub artifact: Option<DraftContent>,

    /// Terminal error for failed runs
    #[serde(default)]
    pub error: Option<String>,
}

impl RunRecord {
    pub fn from_state(state: &WorkflowState, error: Option<String>) -> Self {
        Self {
            run_id: state.run_id.clone(),
            created_at: state.started_at,
            persona_id: state.request.persona_id.clone(),
            content_type: state.request.content_type.name().to_string(),
            platform: state.request.platform.clone(),
            topic: state.request.topic.clone(),
            status: state.status,
            stage_log: state.stage_log.clone(),
            artifact: state.final_artifact().cloned().filter(|_| error.is_none()),
            error,
        }
    }
}

/// File-backed store of run records.
#[derive(Debug, Clone)]
pub struct RunLogStore {
    dir: PathBuf,
}

impl RunLogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default location under the user data dir.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("targetscript").join("runs"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, record: &RunRecord) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating run log dir {}", self.dir.display()))?;
        let path = self.dir.join(format!("{}.json", record.run_id));
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&path, json)
            .with_context(|| format!("writing run record {}", path.display()))?;
        Ok(path)
    }

    pub fn load(&self, run_id: &str) -> Result<RunRecord> {
        let path = self.dir.join(format!("{run_id}.json"));
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading run record {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing run record {}", path.display()))
    }

    /// All stored records, newest first. Unreadable files are skipped.
    pub fn list(&self) -> Result<Vec<RunRecord>> {
        let mut records = Vec::new();
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(records),
            Err(e) => {
                return Err(e).with_context(|| format!("listing run log {}", self.dir.display()))
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match std::fs::read_to_string(&path)
                .ok()
                .and_then(|c| serde_json::from_str::<RunRecord>(&c).ok())
            {
                Some(record) => records.push(record),
                None => tracing::warn!("skipping unreadable run record {}", path.display()),
            }
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}
