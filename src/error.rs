//! Error types for storefinder
//!
//! Input errors are fatal and raised before the browser starts. Browser
//! errors are fatal for the run. Navigation and extraction failures are
//! recovered inside the pipeline and never reach this level.

use std::path::PathBuf;

/// Errors raised while reading or writing seller tables
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Header lacks one or more required columns
    #[error("Input table is missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// Table could not be opened or created
    #[error("Cannot access table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV content
    #[error("Malformed table: {0}")]
    Csv(#[from] csv::Error),
}

/// Top-level errors for a discovery run
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input or output table failure
    #[error(transparent)]
    Table(#[from] TableError),

    /// Browser session failed to start or was lost
    #[error("Browser error: {0}")]
    Browser(String),
}

impl From<anyhow::Error> for FinderError {
    fn from(err: anyhow::Error) -> Self {
        // Use {:#} to preserve full error chain with context
        Self::Browser(format!("{err:#}"))
    }
}

/// Convenience alias for Result with `FinderError`
pub type FinderResult<T> = Result<T, FinderError>;
