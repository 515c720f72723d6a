//! collectors table queries.

use std::collections::BTreeSet;

use dispatch_core::errors::StorageError;
use dispatch_core::types::{AvailabilityWindow, Collector, Coordinate, ScrapCategory};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{corrupt, from_json, sqe, to_json};

const TABLE: &str = "collectors";

const SELECT_COLUMNS: &str =
    "SELECT id, name, lat, lng, categories, available_from, available_to, active FROM collectors";

/// A collectors row as stored.
#[derive(Debug, Clone)]
pub struct CollectorRecord {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub categories: String,
    pub available_from: String,
    pub available_to: String,
    pub active: bool,
}

impl CollectorRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            lat: row.get(2)?,
            lng: row.get(3)?,
            categories: row.get(4)?,
            available_from: row.get(5)?,
            available_to: row.get(6)?,
            active: row.get(7)?,
        })
    }

    pub fn into_collector(self) -> Result<Collector, StorageError> {
        let home = Coordinate::new(self.lat, self.lng).map_err(|e| corrupt(TABLE, &self.id, e))?;
        let categories: BTreeSet<ScrapCategory> = from_json(TABLE, &self.id, &self.categories)?;
        let availability = AvailabilityWindow::parse(&self.available_from, &self.available_to)
            .map_err(|e| corrupt(TABLE, &self.id, e))?;
        Ok(Collector {
            id: self.id,
            name: self.name,
            home,
            categories,
            availability,
            active: self.active,
        })
    }
}

pub fn upsert_collector(conn: &Connection, c: &Collector) -> Result<(), StorageError> {
    let categories = to_json(TABLE, &c.id, &c.categories)?;
    conn.prepare_cached(
        "INSERT INTO collectors
         (id, name, lat, lng, categories, available_from, available_to, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            lat = excluded.lat,
            lng = excluded.lng,
            categories = excluded.categories,
            available_from = excluded.available_from,
            available_to = excluded.available_to,
            active = excluded.active,
            updated_at = unixepoch()",
    )
    .map_err(sqe)?
    .execute(params![
        c.id,
        c.name,
        c.home.lat(),
        c.home.lng(),
        categories,
        c.availability.start().to_string(),
        c.availability.end().to_string(),
        c.active,
    ])
    .map_err(sqe)?;
    Ok(())
}

pub fn get_collector(conn: &Connection, id: &str) -> Result<Option<Collector>, StorageError> {
    let record = conn
        .prepare_cached(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
        .map_err(sqe)?
        .query_row(params![id], CollectorRecord::from_row)
        .optional()
        .map_err(sqe)?;
    record.map(CollectorRecord::into_collector).transpose()
}

/// Every collector, ordered by id. Inactive ones included.
pub fn list_collectors(conn: &Connection) -> Result<Vec<Collector>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!("{SELECT_COLUMNS} ORDER BY id"))
        .map_err(sqe)?;
    let records = stmt
        .query_map([], CollectorRecord::from_row)
        .map_err(sqe)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(sqe)?;
    records.into_iter().map(CollectorRecord::into_collector).collect()
}
