//! Artifact loading seam

use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use super::unavailable;
use crate::error::Result;

/// Turns a production artifact on disk into an in-memory model
///
/// Implementations decode whatever format the trainer wrote. The cache
/// calls `load` at most once per resolution and shares the result.
pub trait ArtifactLoader: Send + Sync {
    type Model: Send + Sync;

    /// Load `artifact`, verifying it against `expected_sha256` when given.
    fn load(&self, artifact: &Path, expected_sha256: Option<&str>) -> Result<Self::Model>;
}

/// Raw artifact contents with their digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactBytes {
    pub bytes: Vec<u8>,
    pub sha256: String,
}

/// Loader that keeps the artifact as opaque bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesLoader;

impl ArtifactLoader for BytesLoader {
    type Model = ArtifactBytes;

    fn load(&self, artifact: &Path, expected_sha256: Option<&str>) -> Result<ArtifactBytes> {
        let bytes = fs::read(artifact).map_err(|e| {
            unavailable(format!("cannot read model artifact {}: {e}", artifact.display()))
        })?;
        let sha256 = hex::encode(Sha256::digest(&bytes));

        if let Some(expected) = expected_sha256 {
            if !expected.eq_ignore_ascii_case(&sha256) {
                return Err(unavailable(format!(
                    "model artifact {} has sha256 {sha256}, registry recorded {expected}",
                    artifact.display()
                )));
            }
        }
        Ok(ArtifactBytes { bytes, sha256 })
    }
}
