//! JSON document persistence
//!
//! Every document the pipeline exchanges (candidate metrics, evaluation
//! result, registry, history) is a pretty-printed JSON file. Writes go to a
//! sibling temp file which is synced and renamed over the target, so a
//! reader never observes a half-written document.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Load a required JSON document.
///
/// An absent file is a [`Error::MissingInput`] naming `what`.
pub fn load<T: DeserializeOwned>(path: &Path, what: &'static str) -> Result<T> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::missing(what, path));
        }
        Err(e) => return Err(Error::io(format!("reading {what} {}", path.display()), e)),
    };
    serde_json::from_str(&text).map_err(|e| Error::Serialization {
        message: format!("{what} {}: {e}", path.display()),
    })
}

/// Write a JSON document atomically, creating parent directories.
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| Error::io(format!("creating {}", parent.display()), e))?;
    }

    let temp_path = temp_path_for(path);
    let file = File::create(&temp_path)
        .map_err(|e| Error::io(format!("creating {}", temp_path.display()), e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|e| Error::io(format!("writing {}", temp_path.display()), e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| Error::io(format!("syncing {}", temp_path.display()), e))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::io(format!("replacing {}", path.display()), e)
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
