//! Promotion executor
//!
//! Turns a passing [`EvaluationVerdict`] into a new production state:
//!
//! 1. Check preconditions (passing, unconsumed verdict; candidate artifact on disk)
//! 2. Take the registry lock and read the current record
//! 3. Derive the next version and its production artifact path
//! 4. Archive the current record to history
//! 5. Copy the candidate artifact to the versioned path
//! 6. Replace the registry record
//!
//! The artifact is copied before the registry is rewritten, so the registry
//! never points at a file that does not exist. Nothing is retried.


use chrono::{DateTime, SubsecRound, Utc};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::gate::{CandidateMetrics, EvaluationVerdict};
use crate::registry::{
    bump_patch, HistoryEntry, RegistryLock, RegistryRecord, RegistryStore, GUARDRAIL_MIN_RECALL,
    VAL_PRECISION_AT_MIN_RECALL, VAL_ROC_AUC,
};

/// Reason stored when the verdict carries none
pub const DEFAULT_PROMOTION_REASON: &str = "Promotion gate passed.";

/// Observable result of a successful promotion
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionOutcome {
    /// New production version
    pub version: String,
    /// Freshly copied production artifact
    pub artifact_path: PathBuf,
    /// Snapshot of the record that was replaced
    pub history: HistoryEntry,
    /// Record now current in the registry
    pub record: RegistryRecord,
}

/// Executes promotions against a registry store
#[derive(Debug)]
pub struct Promoter<S: RegistryStore> {
    store: S,
    production_dir: PathBuf,
}

impl<S: RegistryStore> Promoter<S> {
    pub fn new(store: S, production_dir: impl AsRef<Path>) -> Self {
        Self { store, production_dir: production_dir.as_ref().to_path_buf() }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Promote the candidate described by `candidate` and `candidate_artifact`.
    ///
    /// Fails without mutating anything if the verdict did not pass, was
    /// already consumed, the artifact is missing, or the target version's
    /// artifact already exists.
    pub fn promote(
        &mut self,
        verdict: &EvaluationVerdict,
        candidate: &CandidateMetrics,
        candidate_artifact: &Path,
        now: DateTime<Utc>,
    ) -> Result<PromotionOutcome> {
        check_verdict(verdict)?;
        let summary = serde_json::to_value(verdict.summary())?;
        if !candidate_artifact.is_file() {
            return Err(Error::missing("candidate model", candidate_artifact));
        }

        let _lock = self.store.lock_path().map(RegistryLock::acquire).transpose()?;
        let now = now.trunc_subsecs(0);

        let current = self.store.read()?;
        let version = bump_patch(current.current_model.as_deref());
        let artifact_path =
            self.production_dir.join(production_file_name(&version, candidate_artifact));
        if artifact_path.exists() {
            return Err(Error::ArtifactExists { path: artifact_path });
        }

        let history = self.store.archive(&current, now)?;
        tracing::info!(key = %history.key, location = %history.location.display(), "archived registry");

        fs::create_dir_all(&self.production_dir)
            .map_err(|e| Error::io(format!("creating {}", self.production_dir.display()), e))?;
        let digest = copy_new(candidate_artifact, &artifact_path)?;

        let record = RegistryRecord {
            current_model: Some(version.clone()),
            artifact_path: Some(artifact_path.to_string_lossy().replace('\\', "/")),
            metrics: production_metrics(candidate),
            created_at: Some(now),
            promotion_reason: Some(serde_json::Value::String(
                verdict
                    .reason
                    .clone()
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| DEFAULT_PROMOTION_REASON.to_string()),
            )),
            evaluation_summary: Some(summary),
            artifact_sha256: Some(digest),
            extra: BTreeMap::new(),
        };
        self.store.write(&record)?;

        tracing::info!(
            version = %version,
            previous = ?current.current_model,
            artifact = %artifact_path.display(),
            "promoted candidate to production"
        );
        Ok(PromotionOutcome { version, artifact_path, history, record })
    }
}

fn check_verdict(verdict: &EvaluationVerdict) -> Result<()> {
    if !verdict.passed {
        return Err(Error::PreconditionViolated {
            message: format!(
                "evaluation did not pass ({})",
                verdict.reason.as_deref().unwrap_or("no reason recorded")
            ),
        });
    }
    if let Some(version) = &verdict.promoted_as {
        return Err(Error::AlreadyPromoted { version: version.clone() });
    }
    Ok(())
}

/// Registry metrics for a promoted candidate
fn production_metrics(candidate: &CandidateMetrics) -> BTreeMap<String, f64> {
    BTreeMap::from([
        (VAL_ROC_AUC.to_string(), candidate.val.roc_auc),
        (VAL_PRECISION_AT_MIN_RECALL.to_string(), candidate.val.precision_at_min_recall),
        (GUARDRAIL_MIN_RECALL.to_string(), candidate.guardrail.min_recall),
    ])
}

/// `model_<version>.<ext>`, keeping the candidate's extension
fn production_file_name(version: &str, candidate_artifact: &Path) -> String {
    match candidate_artifact.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("model_{version}.{ext}"),
        None => format!("model_{version}"),
    }
}

/// Copy `src` to a not-yet-existing `dest`, returning the hex SHA-256 of the bytes.
fn copy_new(src: &Path, dest: &Path) -> Result<String> {
    let mut input =
        File::open(src).map_err(|e| Error::io(format!("opening {}", src.display()), e))?;
    let mut output = match OpenOptions::new().write(true).create_new(true).open(dest) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(Error::ArtifactExists { path: dest.to_path_buf() });
        }
        Err(e) => return Err(Error::io(format!("creating {}", dest.display()), e)),
    };

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = input
            .read(&mut buf)
            .map_err(|e| Error::io(format!("reading {}", src.display()), e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        output
            .write_all(&buf[..n])
            .map_err(|e| Error::io(format!("writing {}", dest.display()), e))?;
    }
    output.sync_all().map_err(|e| Error::io(format!("syncing {}", dest.display()), e))?;

    Ok(hex::encode(hasher.finalize()))
}
