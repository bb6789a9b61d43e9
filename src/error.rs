//! Error types for the `strata` binary.
//!
//! Extends the library error with the SQLite- and deployment-specific
//! variants the CLI needs.

use std::path::PathBuf;
use thiserror::Error;

pub use strata_lib::error::ValidationError;

/// Primary error type for CLI and storage operations.
#[derive(Error, Debug)]
pub enum StrataError {
    /// Library-level settings error.
    #[error(transparent)]
    Settings(#[from] strata_lib::SettingsError),

    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Workspace has not been initialized (no `.strata/` directory).
    #[error("Not initialized: run `strata init` first")]
    NotInitialized,

    /// Deployment configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File not found at the specified path.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StrataError {
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }
}

/// Result type using `StrataError`.
pub type Result<T> = std::result::Result<T, StrataError>;
