//! Production model registry
//!
//! The registry is a single JSON document naming the live model version,
//! its artifact and its validation metrics. Every promotion archives the
//! previous document into an append-only history directory before the new
//! one replaces it, so the full chain of production states stays auditable
//! and available for manual rollback.
//!
//! # Example
//!
//! ```no_run
//! use promover::registry::{FileRegistryStore, RegistryStore};
//!
//! let store = FileRegistryStore::new("model_registry/metadata.json", "model_registry/history");
//! let record = store.read()?;
//! if record.is_bootstrap() {
//!     println!("no production model yet");
//! }
//! # Ok::<(), promover::Error>(())
//! ```

mod file;
mod history;
mod lock;
mod memory;
mod record;
mod traits;
mod version;

pub use file::FileRegistryStore;
pub use history::{history_key, HistoryEntry, HISTORY_KEY_FORMAT};
pub use lock::RegistryLock;
pub use memory::InMemoryRegistryStore;
pub use record::{
    EvaluationSummary, RegistryRecord, GUARDRAIL_MIN_RECALL, VAL_PRECISION_AT_MIN_RECALL,
    VAL_ROC_AUC,
};
pub use traits::RegistryStore;
pub use version::{bump_patch, BASELINE_VERSION};
