//! Advisory lock held for the duration of a promotion

use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Exclusive lock file next to the registry document
///
/// The lock is a file created with `create_new`; whoever creates it owns
/// the registry until the guard is dropped. A crashed holder leaves the
/// file behind and it must be removed by hand.
#[derive(Debug)]
pub struct RegistryLock {
    path: PathBuf,
}

impl RegistryLock {
    /// Lock file location for a registry document
    pub fn path_for(registry_path: &Path) -> PathBuf {
        let mut name = registry_path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".lock");
        registry_path.with_file_name(name)
    }

    /// Take the lock, failing immediately if another holder exists.
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| Error::io(format!("creating {}", parent.display()), e))?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(Error::RegistryLocked { path });
            }
            Err(e) => return Err(Error::io(format!("creating lock {}", path.display()), e)),
        };

        // Holder details are informational only.
        let _ = writeln!(file, "pid={} acquired_at={}", std::process::id(), Utc::now().to_rfc3339());
        tracing::debug!(path = %path.display(), "registry lock acquired");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RegistryLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release registry lock");
        }
    }
}
