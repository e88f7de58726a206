//! Storage error handling
//!
//! Typed errors for link store operations. Nothing is retried internally;
//! callers decide what is recoverable.

use thiserror::Error;

/// Errors surfaced by the link store
#[derive(Error, Debug)]
pub enum StoreError {
    /// A required field was empty; nothing was written
    #[error("{field} is missing")]
    Validation { field: &'static str },

    /// No row matched the given id (detected via zero rows affected)
    #[error("item not found: {id}")]
    NotFound { id: i64 },

    /// A weight direction outside {up, down}
    #[error("unsupported action: {action}")]
    UnsupportedAction { action: String },

    /// Underlying SQLite failure
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create the directory holding the database file
    #[error("failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A schema migration failed to apply
    #[error("failed to apply migration {version} ({name}): {source}")]
    Migration {
        version: i64,
        name: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl StoreError {
    /// True when the failure is SQLite reporting a missing table
    ///
    /// This is the first-run signal: a fresh database has no `links` table
    /// until the baseline schema is applied.
    pub fn is_missing_table(&self) -> bool {
        match self {
            StoreError::Database(rusqlite::Error::SqliteFailure(_, Some(msg))) => {
                msg.contains("no such table")
            }
            _ => false,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
