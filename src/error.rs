//! Error taxonomy shared across the persistence, export, and configuration
//! layers. Helper functions return these typed errors so call sites can tell
//! a broken database file apart from a bad query or a failed copy; the UI
//! layer flattens them into status messages.

use std::path::PathBuf;

use thiserror::Error;

/// Typed failures surfaced by the non-UI layers.
#[derive(Debug, Error)]
pub enum AppError {
    /// The database file could not be opened, or the handle is closed.
    #[error("database connection failed: {0}")]
    Connection(String),

    /// Malformed SQL, a missing table, or a constraint violation.
    #[error("query failed: {0}")]
    Query(String),

    /// Copying a database file into the working directory failed.
    #[error("failed to copy {path}: {source}")]
    FileCopy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file exists but could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Writing a CSV export file failed.
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem errors outside the copy path (creating directories,
    /// reading the configuration file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used by every helper layer.
pub type Result<T> = std::result::Result<T, AppError>;
