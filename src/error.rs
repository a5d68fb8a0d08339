//! Error types with actionable diagnostics.
//!
//! A failing evaluation gate is not an error: it is an ordinary
//! [`EvaluationVerdict`](crate::gate::EvaluationVerdict) with `passed = false`.
//! Everything in this module aborts the current run before (or without)
//! mutating the registry.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for promover operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while evaluating, promoting or serving models.
#[derive(Error, Debug)]
pub enum Error {
    /// A required input document or artifact is absent.
    #[error("Missing {what}: {path}\n  → Run the producing step first or point the path override at the right file")]
    MissingInput { what: &'static str, path: PathBuf },

    /// Configuration value is invalid.
    #[error("Invalid configuration value for '{field}': {message}")]
    Config { field: String, message: String },

    /// Registry document exists but cannot be trusted.
    #[error("Malformed registry at {path}: {message}\n  → Restore the document from the history directory")]
    MalformedRegistry { path: PathBuf, message: String },

    /// Promotion invoked without a passing verdict.
    #[error("Promotion precondition violated: {message}\n  → A failed gate needs a new candidate, not a retry")]
    PreconditionViolated { message: String },

    /// The verdict document was already used for a promotion.
    #[error("Evaluation result was already promoted as {version}\n  → Re-run evaluate for a new candidate")]
    AlreadyPromoted { version: String },

    /// The versioned production artifact is already on disk.
    #[error("Production artifact already exists: {path}\n  → Another promotion produced this version; inspect the registry history")]
    ArtifactExists { path: PathBuf },

    /// Another process holds the registry lock.
    #[error("Registry is locked by another promotion: {path}\n  → Wait for it to finish or remove a stale lock file")]
    RegistryLocked { path: PathBuf },

    /// The serving read path cannot resolve a production model.
    #[error("Production model unavailable: {message}")]
    ServingUnavailable { message: String },

    /// Metric computation received unusable input.
    #[error("Metric computation failed: {0}")]
    Metrics(#[from] crate::metrics::MetricsError),

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    pub(crate) fn missing(what: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::MissingInput { what, path: path.into() }
    }

    pub(crate) fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config { field: field.into(), message: message.into() }
    }

    /// Check if this error is fixable by the operator without code changes.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::MissingInput { .. }
                | Self::Config { .. }
                | Self::PreconditionViolated { .. }
                | Self::AlreadyPromoted { .. }
                | Self::RegistryLocked { .. }
        )
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingInput { .. } => "E001",
            Self::Config { .. } => "E002",
            Self::MalformedRegistry { .. } => "E010",
            Self::PreconditionViolated { .. } => "E020",
            Self::AlreadyPromoted { .. } => "E021",
            Self::ArtifactExists { .. } => "E022",
            Self::RegistryLocked { .. } => "E030",
            Self::ServingUnavailable { .. } => "E040",
            Self::Metrics(_) => "E050",
            Self::Io { .. } => "E060",
            Self::Serialization { .. } => "E061",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization { message: err.to_string() }
    }
}
