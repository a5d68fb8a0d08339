//! Inference-side read path
//!
//! Serving never writes. It resolves the registry's production pointer,
//! loads the referenced artifact once per process through an
//! [`ArtifactLoader`], and exposes the public read contract as
//! [`ProductionInfo`].
//!
//! # Example
//!
//! ```no_run
//! use promover::registry::FileRegistryStore;
//! use promover::serving::{BytesLoader, ProductionCache};
//!
//! let store = FileRegistryStore::new("model_registry/metadata.json", "model_registry/history");
//! let cache = ProductionCache::new(store, BytesLoader);
//! let loaded = cache.get()?;
//! println!("serving {} ({} bytes)", loaded.info.current_model, loaded.model.bytes.len());
//! # Ok::<(), promover::Error>(())
//! ```

mod cache;
mod loader;


pub use cache::{LoadedModel, ProductionCache};
pub use loader::{ArtifactBytes, ArtifactLoader, BytesLoader};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::registry::{RegistryRecord, RegistryStore};

/// Public read contract of the production registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionInfo {
    pub current_model: String,
    pub artifact_path: String,
    pub metrics: BTreeMap<String, f64>,
    pub created_at: Option<DateTime<Utc>>,
    /// Recorded digest of the artifact, if the promotion stored one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_sha256: Option<String>,
}

impl ProductionInfo {
    /// Extract the read contract from a record that names a live model.
    pub fn from_record(record: &RegistryRecord) -> Result<Self> {
        let (Some(current_model), Some(artifact_path)) =
            (record.current_model.as_deref(), record.artifact_path.as_deref())
        else {
            return Err(unavailable(
                "registry is missing current_model or artifact_path; run promote first",
            ));
        };
        Ok(Self {
            current_model: current_model.to_string(),
            artifact_path: artifact_path.to_string(),
            metrics: record.metrics.clone(),
            created_at: record.created_at,
            artifact_sha256: record.artifact_sha256.clone(),
        })
    }

    pub fn artifact(&self) -> &Path {
        Path::new(&self.artifact_path)
    }
}

/// Resolve the production model named by `store` and check its artifact is on disk.
///
/// Any failure is reported as [`Error::ServingUnavailable`], including a
/// malformed registry.
pub fn resolve_production<S: RegistryStore + ?Sized>(store: &S) -> Result<ProductionInfo> {
    let record = store.read().map_err(|e| unavailable(format!("cannot read registry: {e}")))?;
    let info = ProductionInfo::from_record(&record)?;

    let artifact = PathBuf::from(&info.artifact_path);
    if !artifact.is_file() {
        return Err(unavailable(format!("model artifact not found at {}", artifact.display())));
    }
    Ok(info)
}

pub(crate) fn unavailable(message: impl Into<String>) -> Error {
    Error::ServingUnavailable { message: message.into() }
}
