//! PRAGMAs applied to every connection immediately after opening.

use dispatch_core::errors::StorageError;
use rusqlite::Connection;

use crate::queries::sqe;

/// WAL for readers during writes; `busy_timeout` is what lets two engine
/// processes queue behind each other's `BEGIN IMMEDIATE`.
pub fn configure_connection(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        PRAGMA cache_size = -8000;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(sqe)
}

/// Reader connections: same settings, plus `query_only`.
pub fn configure_readonly_connection(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA busy_timeout = 5000;
        PRAGMA cache_size = -8000;
        PRAGMA temp_store = MEMORY;
        PRAGMA query_only = ON;
        ",
    )
    .map_err(sqe)
}
