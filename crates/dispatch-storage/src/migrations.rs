//! Schema versioning.
//!
//! The version lives in a dedicated single-row `dispatch_schema_version`
//! table. Each version bump is a const SQL string in `schema`.

use dispatch_core::errors::StorageError;
use rusqlite::{params, Connection};
use tracing::info;

use crate::queries::sqe;
use crate::schema::DISPATCH_TABLES_V1;

/// Current schema version. Bump this when adding new migrations.
pub const CURRENT_VERSION: u32 = 1;

/// The schema version recorded in the database, 0 when none is recorded.
pub fn get_schema_version(conn: &Connection) -> Result<u32, StorageError> {
    let exists: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master
             WHERE type = 'table' AND name = 'dispatch_schema_version'",
            [],
            |row| row.get(0),
        )
        .map_err(sqe)?;
    if !exists {
        return Ok(0);
    }

    match conn.query_row("SELECT version FROM dispatch_schema_version LIMIT 1", [], |row| {
        row.get::<_, u32>(0)
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(sqe(e)),
    }
}

fn set_schema_version(conn: &Connection, version: u32) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS dispatch_schema_version (
            version INTEGER NOT NULL
        ) STRICT;",
    )
    .map_err(sqe)?;
    conn.execute("DELETE FROM dispatch_schema_version", [])
        .map_err(sqe)?;
    conn.execute(
        "INSERT INTO dispatch_schema_version (version) VALUES (?1)",
        params![version],
    )
    .map_err(sqe)?;
    Ok(())
}

fn apply(conn: &Connection, version: u32, sql: &str) -> Result<(), StorageError> {
    let tx = conn.unchecked_transaction().map_err(sqe)?;
    tx.execute_batch(sql)
        .map_err(|e| StorageError::MigrationFailed {
            version,
            message: e.to_string(),
        })?;
    set_schema_version(&tx, version)?;
    tx.commit().map_err(sqe)
}

/// Run all pending migrations. Returns the version the database ends at.
pub fn migrate(conn: &Connection) -> Result<u32, StorageError> {
    let current = get_schema_version(conn)?;
    if current > CURRENT_VERSION {
        return Err(StorageError::MigrationFailed {
            version: current,
            message: format!("database is newer than this build (max {CURRENT_VERSION})"),
        });
    }
    if current == CURRENT_VERSION {
        return Ok(current);
    }

    if current < 1 {
        info!("migrating dispatch schema: 0 -> 1 (initial tables)");
        apply(conn, 1, DISPATCH_TABLES_V1)?;
    }

    let final_version = get_schema_version(conn)?;
    info!(from = current, to = final_version, "dispatch schema migration complete");
    Ok(final_version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DISPATCH_TABLE_NAMES;

    fn fresh_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::pragmas::configure_connection(&conn).unwrap();
        conn
    }

    #[test]
    fn test_fresh_db_version_is_zero() {
        assert_eq!(get_schema_version(&fresh_db()).unwrap(), 0);
    }

    #[test]
    fn test_migrate_creates_tables() {
        let conn = fresh_db();
        assert_eq!(migrate(&conn).unwrap(), CURRENT_VERSION);
        for table in DISPATCH_TABLE_NAMES {
            let exists: bool = conn
                .query_row(
                    "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert!(exists, "{table} missing");
        }
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let conn = fresh_db();
        migrate(&conn).unwrap();
        assert_eq!(migrate(&conn).unwrap(), CURRENT_VERSION);
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM dispatch_schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_newer_database_refused() {
        let conn = fresh_db();
        migrate(&conn).unwrap();
        set_schema_version(&conn, CURRENT_VERSION + 1).unwrap();
        assert!(matches!(
            migrate(&conn),
            Err(StorageError::MigrationFailed { .. })
        ));
    }

    #[test]
    fn test_status_check_constraint() {
        let conn = fresh_db();
        migrate(&conn).unwrap();
        let err = conn.execute(
            "INSERT INTO pickup_requests
             (id, submission_id, user_id, origin_lat, origin_lng, categories,
              preferred_date, preferred_time, pickup_address, status, created_at, updated_at)
             VALUES ('r', 's', 'u', 0.0, 0.0, '[]', '2026-01-01', '09:00', 'a', 'shipped', 't', 't')",
            [],
        );
        assert!(err.is_err());
    }
}
