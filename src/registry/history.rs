//! Superseded registry snapshots

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use super::record::RegistryRecord;

/// `strftime` pattern for history keys (UTC, second precision)
pub const HISTORY_KEY_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// History key for a supersession time, e.g. `20250101T120000Z`
pub fn history_key(at: DateTime<Utc>) -> String {
    at.format(HISTORY_KEY_FORMAT).to_string()
}

/// File name of a history document for `key`
pub(crate) fn history_file_name(key: &str) -> String {
    format!("registry_{key}.json")
}

/// Key encoded in a history file name, if it is one
pub(crate) fn key_from_file_name(name: &str) -> Option<&str> {
    name.strip_prefix("registry_")?.strip_suffix(".json")
}

/// An archived registry record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// Supersession key (`YYYYMMDDThhmmssZ`, with a `-N` suffix on collision)
    pub key: String,
    /// Where the snapshot is stored
    pub location: PathBuf,
    /// The record exactly as it was before being replaced
    pub record: RegistryRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_history_key_format() {
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(history_key(at), "20250307T090501Z");
    }

    #[test]
    fn test_file_name_roundtrip() {
        let name = history_file_name("20250307T090501Z");
        assert_eq!(name, "registry_20250307T090501Z.json");
        assert_eq!(key_from_file_name(&name), Some("20250307T090501Z"));
        assert_eq!(key_from_file_name("metadata.json"), None);
    }
}
