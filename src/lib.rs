//! # Promover: evaluation gate and model registry
//!
//! Promover decides whether a newly trained binary classifier may replace
//! the model currently in production, and if so promotes it into a
//! versioned, auditable registry.
//!
//! ## Pipeline
//!
//! - [`metrics`]: ROC AUC and precision at a minimum recall
//! - [`gate`]: stateless comparison of candidate against production
//! - [`promote`]: versioned copy, history archive and registry update
//! - [`registry`]: the registry document, its history and the store seam
//! - [`serving`]: read-only resolution and caching of the production model
//!
//! ## Example
//!
//! ```no_run
//! use chrono::Utc;
//! use promover::config::Settings;
//! use promover::document;
//! use promover::gate::{evaluate, CandidateMetrics};
//! use promover::promote::Promoter;
//! use promover::registry::RegistryStore;
//!
//! let settings = Settings::load(None)?;
//! let candidate: CandidateMetrics =
//!     document::load(&settings.candidate_metrics_path(), "candidate metrics")?;
//!
//! let store = settings.registry_store();
//! let verdict = evaluate(&candidate, &store.read()?, &settings.policy, Utc::now());
//! if verdict.passed {
//!     let mut promoter = Promoter::new(store, settings.production_dir());
//!     let outcome = promoter.promote(
//!         &verdict,
//!         &candidate,
//!         &settings.candidate_model_path(),
//!         Utc::now(),
//!     )?;
//!     println!("promoted {}", outcome.version);
//! }
//! # Ok::<(), promover::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod gate;
pub mod metrics;
pub mod promote;
pub mod registry;
pub mod serving;

pub use error::{Error, Result};
