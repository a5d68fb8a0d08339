//! JSON file-backed registry store

use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::history::{history_file_name, history_key, key_from_file_name, HistoryEntry};
use super::lock::RegistryLock;
use super::record::RegistryRecord;
use super::traits::RegistryStore;
use crate::document;
use crate::error::{Error, Result};

/// Registry document plus a directory of history documents
///
/// The registry is replaced with write-to-temp + rename. History files are
/// named `registry_<key>.json` and created with `create_new`, so an
/// existing snapshot is never overwritten. Archiving the record currently
/// on disk copies the document text byte for byte.
#[derive(Debug, Clone)]
pub struct FileRegistryStore {
    registry_path: PathBuf,
    history_dir: PathBuf,
    lock_path: PathBuf,
}

impl FileRegistryStore {
    pub fn new(registry_path: impl AsRef<Path>, history_dir: impl AsRef<Path>) -> Self {
        let registry_path = registry_path.as_ref().to_path_buf();
        let lock_path = RegistryLock::path_for(&registry_path);
        Self { registry_path, history_dir: history_dir.as_ref().to_path_buf(), lock_path }
    }

    pub fn registry_path(&self) -> &Path {
        &self.registry_path
    }

    pub fn history_dir(&self) -> &Path {
        &self.history_dir
    }

    fn malformed(&self, message: impl Into<String>) -> Error {
        Error::MalformedRegistry { path: self.registry_path.clone(), message: message.into() }
    }

    /// Current document text, if it still holds `record`
    fn current_text_for(&self, record: &RegistryRecord) -> Option<String> {
        let text = fs::read_to_string(&self.registry_path).ok()?;
        let current: RegistryRecord = serde_json::from_str(&text).ok()?;
        (current == *record).then_some(text)
    }

    fn read_history_file(&self, key: &str, path: &Path) -> Result<HistoryEntry> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("reading history {}", path.display()), e))?;
        let record: RegistryRecord = serde_json::from_str(&text).map_err(|e| {
            Error::Serialization { message: format!("history {}: {e}", path.display()) }
        })?;
        Ok(HistoryEntry { key: key.to_string(), location: path.to_path_buf(), record })
    }
}

impl RegistryStore for FileRegistryStore {
    fn read(&self) -> Result<RegistryRecord> {
        let text = match fs::read_to_string(&self.registry_path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(RegistryRecord::bootstrap());
            }
            Err(e) => {
                return Err(Error::io(format!("reading {}", self.registry_path.display()), e));
            }
        };

        if text.trim().is_empty() {
            return Err(self.malformed("document is empty"));
        }
        let record: RegistryRecord =
            serde_json::from_str(&text).map_err(|e| self.malformed(e.to_string()))?;
        record.validate().map_err(|m| self.malformed(m))?;
        Ok(record)
    }

    fn write(&mut self, record: &RegistryRecord) -> Result<()> {
        document::save(&self.registry_path, record)
    }

    fn archive(&mut self, record: &RegistryRecord, at: DateTime<Utc>) -> Result<HistoryEntry> {
        fs::create_dir_all(&self.history_dir)
            .map_err(|e| Error::io(format!("creating {}", self.history_dir.display()), e))?;

        let json = match self.current_text_for(record) {
            Some(text) => text,
            None => serde_json::to_string_pretty(record)? + "\n",
        };
        let base = history_key(at);
        let mut attempt = 0u32;
        loop {
            let key = if attempt == 0 { base.clone() } else { format!("{base}-{attempt}") };
            let path = self.history_dir.join(history_file_name(&key));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(json.as_bytes())
                        .and_then(|()| file.sync_all())
                        .map_err(|e| Error::io(format!("writing history {}", path.display()), e))?;
                    return Ok(HistoryEntry { key, location: path, record: record.clone() });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => {
                    return Err(Error::io(format!("creating history {}", path.display()), e));
                }
            }
        }
    }

    fn history(&self) -> Result<Vec<HistoryEntry>> {
        if !self.history_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let dir = fs::read_dir(&self.history_dir)
            .map_err(|e| Error::io(format!("listing {}", self.history_dir.display()), e))?;
        for entry in dir {
            let entry = entry.map_err(|e| Error::io("listing history", e))?;
            let name = entry.file_name();
            let Some(key) = name.to_str().and_then(key_from_file_name) else {
                continue;
            };
            entries.push(self.read_history_file(key, &entry.path())?);
        }
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    fn lock_path(&self) -> Option<&Path> {
        Some(&self.lock_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> FileRegistryStore {
        FileRegistryStore::new(dir.path().join("metadata.json"), dir.path().join("history"))
    }

    fn live_record(version: &str) -> RegistryRecord {
        let mut record = RegistryRecord::bootstrap();
        record.current_model = Some(version.to_string());
        record.artifact_path = Some(format!("artifacts/production/model_{version}.joblib"));
        record.metrics.insert("val_roc_auc".into(), 0.9);
        record
    }

    #[test]
    fn test_read_absent_is_bootstrap() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store(&dir).read().unwrap(), RegistryRecord::bootstrap());
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let record = live_record("v0.1.0");
        store.write(&record).unwrap();
        assert_eq!(store.read().unwrap(), record);
    }

    #[test]
    fn test_read_unparseable_is_malformed() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(store.registry_path(), "{ not json").unwrap();
        assert!(matches!(store.read().unwrap_err(), Error::MalformedRegistry { .. }));
    }

    #[test]
    fn test_read_empty_file_is_malformed() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(store.registry_path(), "").unwrap();
        assert!(matches!(store.read().unwrap_err(), Error::MalformedRegistry { .. }));
    }

    #[test]
    fn test_read_model_without_artifact_is_malformed() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(store.registry_path(), r#"{"current_model": "v0.1.0", "metrics": {}}"#).unwrap();
        let err = store.read().unwrap_err();
        assert!(err.to_string().contains("artifact_path"));
    }

    #[test]
    fn test_archive_does_not_touch_current() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let current = live_record("v0.1.0");
        store.write(&current).unwrap();

        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let entry = store.archive(&live_record("v0.0.9"), at).unwrap();

        assert_eq!(entry.key, "20250102T030405Z");
        assert!(entry.location.ends_with("history/registry_20250102T030405Z.json"));
        assert_eq!(store.read().unwrap(), current);
    }

    #[test]
    fn test_archive_copies_current_document_verbatim() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let original = r#"{
  "current_model": "v0.1.2",
  "artifact_path": "artifacts/production/model_v0.1.2.joblib",
  "metrics": {"val_roc_auc": 0.9, "val_f1": null},
  "created_at": "2025-01-01T00:00:00.123456+00:00",
  "evaluation_summary": {"passed": true, "ticket": "FRAUD-12",
                         "policy": {"min_auc_improvement": 0.015, "approved_by": "ops"}},
  "owner": "fraud-team"
}"#;
        fs::write(store.registry_path(), original).unwrap();

        let current = store.read().unwrap();
        let entry = store.archive(&current, Utc::now()).unwrap();

        assert_eq!(fs::read_to_string(&entry.location).unwrap(), original);
        assert_eq!(store.history().unwrap()[0].record, current);
    }

    #[test]
    fn test_archive_serializes_records_not_on_disk() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        store.write(&live_record("v0.1.0")).unwrap();

        let entry = store.archive(&live_record("v0.0.9"), Utc::now()).unwrap();
        let text = fs::read_to_string(&entry.location).unwrap();
        assert!(text.contains("v0.0.9"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_read_accepts_free_form_audit_fields() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(
            store.registry_path(),
            r#"{"current_model": "v0.1.0", "artifact_path": "m.joblib", "metrics": null,
                "evaluation_summary": "manual rollback by ops"}"#,
        )
        .unwrap();

        let record = store.read().unwrap();
        assert_eq!(record.current_model.as_deref(), Some("v0.1.0"));
        assert!(record.metrics.is_empty());
    }

    #[test]
    fn test_archive_same_second_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

        let first = store.archive(&live_record("v0.1.0"), at).unwrap();
        let second = store.archive(&live_record("v0.1.1"), at).unwrap();

        assert_ne!(first.location, second.location);
        assert_eq!(second.key, "20250102T030405Z-1");
        let history = store.history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].record.current_model.as_deref(), Some("v0.1.0"));
        assert_eq!(history[1].record.current_model.as_deref(), Some("v0.1.1"));
    }

    #[test]
    fn test_history_ignores_foreign_files() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        store.archive(&RegistryRecord::bootstrap(), Utc::now()).unwrap();
        fs::write(store.history_dir().join("notes.txt"), "hello").unwrap();

        assert_eq!(store.history().unwrap().len(), 1);
    }

    #[test]
    fn test_history_absent_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).history().unwrap().is_empty());
    }

    #[test]
    fn test_lock_path_is_exposed() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert_eq!(store.lock_path(), Some(dir.path().join("metadata.json.lock").as_path()));
    }
}
