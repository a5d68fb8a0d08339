//! In-memory registry store implementation

use chrono::{DateTime, Utc};
use std::path::PathBuf;

use super::history::{history_file_name, history_key, HistoryEntry};
use super::record::RegistryRecord;
use super::traits::RegistryStore;
use crate::error::Result;

/// In-memory registry store for testing
///
/// Counts writes so callers can assert that a rejected operation left the
/// registry untouched.
#[derive(Debug, Default)]
pub struct InMemoryRegistryStore {
    current: Option<RegistryRecord>,
    history: Vec<HistoryEntry>,
    writes: usize,
}

impl InMemoryRegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already has `record` as its current state
    pub fn with_record(record: RegistryRecord) -> Self {
        Self { current: Some(record), ..Self::default() }
    }

    /// Number of `write` + `archive` calls so far
    pub fn mutation_count(&self) -> usize {
        self.writes
    }
}

impl RegistryStore for InMemoryRegistryStore {
    fn read(&self) -> Result<RegistryRecord> {
        Ok(self.current.clone().unwrap_or_else(RegistryRecord::bootstrap))
    }

    fn write(&mut self, record: &RegistryRecord) -> Result<()> {
        self.writes += 1;
        self.current = Some(record.clone());
        Ok(())
    }

    fn archive(&mut self, record: &RegistryRecord, at: DateTime<Utc>) -> Result<HistoryEntry> {
        self.writes += 1;
        let base = history_key(at);
        let taken = self.history.iter().filter(|e| e.key.starts_with(&base)).count();
        let key = if taken == 0 { base } else { format!("{base}-{taken}") };
        let entry = HistoryEntry {
            location: PathBuf::from("memory").join(history_file_name(&key)),
            key,
            record: record.clone(),
        };
        self.history.push(entry.clone());
        Ok(entry)
    }

    fn history(&self) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.history.clone();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }
}
