//! Registry store trait definition

use chrono::{DateTime, Utc};
use std::path::Path;

use super::history::HistoryEntry;
use super::record::RegistryRecord;
use crate::error::Result;

/// Durable home of the production pointer and its history
pub trait RegistryStore: Send + Sync {
    /// Current record, or [`RegistryRecord::bootstrap`] when none was ever written.
    ///
    /// Present but structurally invalid content is an error.
    fn read(&self) -> Result<RegistryRecord>;

    /// Replace the current record.
    fn write(&mut self, record: &RegistryRecord) -> Result<()>;

    /// Append `record` to history, keyed by `at`, leaving the current record untouched.
    fn archive(&mut self, record: &RegistryRecord, at: DateTime<Utc>) -> Result<HistoryEntry>;

    /// All archived records ordered by key (oldest first).
    fn history(&self) -> Result<Vec<HistoryEntry>>;

    /// Location of the advisory lock guarding promotions, if the store has one.
    fn lock_path(&self) -> Option<&Path> {
        None
    }
}
