//! Per-table query functions. Each takes a `&Connection` and maps
//! between flat SQLite records and `dispatch-core` types.

pub mod collectors;
pub mod drop_offs;
pub mod requests;

use chrono::{DateTime, SecondsFormat, Utc};
use dispatch_core::errors::StorageError;
use rusqlite::ErrorCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// rusqlite error → StorageError. Lock contention that outlived
/// `busy_timeout` surfaces as `DbBusy`.
pub(crate) fn sqe(e: rusqlite::Error) -> StorageError {
    match e.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => StorageError::DbBusy,
        _ => StorageError::SqliteError {
            message: e.to_string(),
        },
    }
}

pub(crate) fn corrupt(table: &'static str, id: &str, details: impl ToString) -> StorageError {
    StorageError::CorruptRow {
        table,
        id: id.to_string(),
        details: details.to_string(),
    }
}

pub(crate) fn to_json<T: Serialize + ?Sized>(
    table: &'static str,
    id: &str,
    value: &T,
) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| corrupt(table, id, e))
}

pub(crate) fn from_json<T: DeserializeOwned>(
    table: &'static str,
    id: &str,
    text: &str,
) -> Result<T, StorageError> {
    serde_json::from_str(text).map_err(|e| corrupt(table, id, e))
}

/// Fixed-width RFC 3339 with nanoseconds, so TEXT ordering is time ordering.
pub(crate) fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_ts(table: &'static str, id: &str, text: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| corrupt(table, id, format!("timestamp {text:?}: {e}")))
}
