//! Storage-layer errors.

use super::error_code::{self, DispatchErrorCode};

/// Errors raised by a request store or directory implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Database busy (another operation in progress)")]
    DbBusy,

    #[error("Corrupt {table} row {id}: {details}")]
    CorruptRow {
        table: &'static str,
        id: String,
        details: String,
    },

    #[error("Duplicate id in {table}: {id}")]
    Duplicate { table: &'static str, id: String },

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl DispatchErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DbBusy => error_code::DB_BUSY,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::CorruptRow { .. } => error_code::CORRUPT_ROW,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
