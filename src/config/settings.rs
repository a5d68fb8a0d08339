//! Layered runtime settings
//!
//! Resolution order, later layers winning:
//!
//! 1. Built-in defaults
//! 2. Optional YAML file (`--config`)
//! 3. Environment variables
//! 4. Command-line flags (applied by each command)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::gate::PromotionPolicy;
use crate::registry::FileRegistryStore;

/// Environment variable names recognised by [`Settings::apply_env`]
pub mod env {
    pub const ARTIFACT_DIR: &str = "ARTIFACT_DIR";
    pub const REGISTRY_PATH: &str = "REGISTRY_PATH";
    pub const HISTORY_DIR: &str = "HISTORY_DIR";
    pub const PRODUCTION_DIR: &str = "PRODUCTION_DIR";
    pub const MIN_AUC_IMPROVEMENT: &str = "MIN_AUC_IMPROVEMENT";
    pub const MIN_RECALL_GUARDRAIL: &str = "MIN_RECALL_GUARDRAIL";
}

pub const CANDIDATE_METRICS_FILE: &str = "candidate_metrics.json";
pub const CANDIDATE_MODEL_FILE: &str = "candidate_model.joblib";
pub const EVALUATION_RESULT_FILE: &str = "evaluation_result.json";

/// Paths and thresholds shared by every command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory holding candidate outputs and the evaluation result
    pub artifact_dir: PathBuf,
    /// Registry document
    pub registry_path: PathBuf,
    /// Directory of archived registry documents
    pub history_dir: PathBuf,
    /// Where promoted artifacts are copied; `<artifact_dir>/production` if unset
    pub production_dir: Option<PathBuf>,
    /// Gate thresholds
    pub policy: PromotionPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("artifacts"),
            registry_path: PathBuf::from("model_registry/metadata.json"),
            history_dir: PathBuf::from("model_registry/history"),
            production_dir: None,
            policy: PromotionPolicy::default(),
        }
    }
}

impl Settings {
    /// Resolve settings from an optional YAML file and the process environment.
    pub fn load(config: Option<&Path>) -> Result<Self> {
        Self::load_with(config, |key| std::env::var(key).ok())
    }

    /// Like [`load`](Self::load) with an explicit environment lookup.
    pub fn load_with<F>(config: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match config {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        settings.apply_env(lookup)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse a YAML settings file; absent keys take their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::missing("configuration file", path));
            }
            Err(e) => return Err(Error::io(format!("reading {}", path.display()), e)),
        };
        Self::from_yaml_str(&text)
            .map_err(|e| Error::config("config", format!("{}: {e}", path.display())))
    }

    pub fn from_yaml_str(text: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Overlay environment variables. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(env::ARTIFACT_DIR) {
            self.artifact_dir = PathBuf::from(v);
        }
        if let Some(v) = get(env::REGISTRY_PATH) {
            self.registry_path = PathBuf::from(v);
        }
        if let Some(v) = get(env::HISTORY_DIR) {
            self.history_dir = PathBuf::from(v);
        }
        if let Some(v) = get(env::PRODUCTION_DIR) {
            self.production_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = get(env::MIN_AUC_IMPROVEMENT) {
            self.policy.min_auc_improvement = parse_threshold(env::MIN_AUC_IMPROVEMENT, &v)?;
        }
        if let Some(v) = get(env::MIN_RECALL_GUARDRAIL) {
            self.policy.min_recall_guardrail = parse_threshold(env::MIN_RECALL_GUARDRAIL, &v)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for (field, path) in [
            ("artifact_dir", &self.artifact_dir),
            ("registry_path", &self.registry_path),
            ("history_dir", &self.history_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(Error::config(field, "path must not be empty"));
            }
        }
        self.policy.validate()
    }

    pub fn production_dir(&self) -> PathBuf {
        self.production_dir.clone().unwrap_or_else(|| self.artifact_dir.join("production"))
    }

    pub fn candidate_metrics_path(&self) -> PathBuf {
        self.artifact_dir.join(CANDIDATE_METRICS_FILE)
    }

    pub fn candidate_model_path(&self) -> PathBuf {
        self.artifact_dir.join(CANDIDATE_MODEL_FILE)
    }

    pub fn evaluation_result_path(&self) -> PathBuf {
        self.artifact_dir.join(EVALUATION_RESULT_FILE)
    }

    /// File-backed registry store at the configured locations
    pub fn registry_store(&self) -> FileRegistryStore {
        FileRegistryStore::new(&self.registry_path, &self.history_dir)
    }
}

fn parse_threshold(key: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| Error::config(key, format!("'{value}' is not a number ({e})")))
}
