//! Configuration loading
//!
//! Settings come from `.targetscript.toml`, found by walking up from the
//! current directory with a global fallback under the user config dir.
//! Every field has a default, so no file is required.

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gateway::GatewayConfig;

use crate::retry::RetryPolicy;

/// Find a config file by walking up the directory tree, then checking the
/// global config at ~/.config/targetscript/.
fn find_config_file(filename: &str) -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let candidate = current.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join("targetscript").join(filename);
        if global_path.exists() {
            return Some(global_path);
        }
    }

    None
}

/// Pipeline execution settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// QA alignment score below which a revision is required
    pub qa_revision_threshold: u8,

    /// Attempt budget per stage, including the first attempt
    pub max_attempts: u32,

    /// Wall-clock limit per stage attempt
    pub stage_timeout_secs: u64,

    pub backoff_base_ms: u64,
    pub backoff_cap_ms: u64,

    /// Where run records are written; defaults to the user data dir
    pub run_log_dir: Option<PathBuf>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            qa_revision_threshold: 70,
            max_attempts: 3,
            stage_timeout_secs: 90,
            backoff_base_ms: 500,
            backoff_cap_ms: 8000,
            run_log_dir: None,
        }
    }
}

impl OrchestratorConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.backoff_base_ms),
            max_delay: Duration::from_millis(self.backoff_cap_ms),
        }
    }

    pub fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.stage_timeout_secs)
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub orchestrator: OrchestratorConfig,
}

impl AppConfig {
    /// Load config from `.targetscript.toml`.
    ///
    /// Search order:
    /// 1. Walk up directory tree from cwd
    /// 2. ~/.config/targetscript/.targetscript.toml (global fallback)
    /// 3. Fall back to defaults
    pub fn load() -> Result<Self> {
        if let Some(config_path) = find_config_file(".targetscript.toml") {
            tracing::debug!("Loading config from: {}", config_path.display());
            return Self::load_from_path(&config_path);
        }

        tracing::debug!("No .targetscript.toml found, using defaults");
        Ok(Self::default())
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.qa_revision_threshold, 70);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_policy().base_delay, Duration::from_millis(500));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [orchestrator]
            qa_revision_threshold = 60

            [gateway]
            max_concurrency = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.orchestrator.qa_revision_threshold, 60);
        assert_eq!(config.orchestrator.max_attempts, 3);
        assert_eq!(config.gateway.max_concurrency, 2);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.orchestrator.stage_timeout_secs, 90);
        assert!(config.orchestrator.run_log_dir.is_none());
    }

    #[test]
    fn load_from_missing_path_errors() {
        assert!(AppConfig::load_from_path(Path::new("/nonexistent/.targetscript.toml")).is_err());
    }
}
