//! drop_off_points table queries.

use dispatch_core::errors::StorageError;
use dispatch_core::types::{Coordinate, DropOffPoint};
use rusqlite::{params, Connection};

use super::{corrupt, sqe};

pub fn upsert_drop_off_point(conn: &Connection, p: &DropOffPoint) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO drop_off_points (id, name, lat, lng, address, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            lat = excluded.lat,
            lng = excluded.lng,
            address = excluded.address,
            active = excluded.active",
    )
    .map_err(sqe)?
    .execute(params![
        p.id,
        p.name,
        p.location.lat(),
        p.location.lng(),
        p.address,
        p.active
    ])
    .map_err(sqe)?;
    Ok(())
}

pub fn list_drop_off_points(conn: &Connection) -> Result<Vec<DropOffPoint>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, name, lat, lng, address, active FROM drop_off_points ORDER BY id",
        )
        .map_err(sqe)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, bool>(5)?,
            ))
        })
        .map_err(sqe)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(sqe)?;

    rows.into_iter()
        .map(|(id, name, lat, lng, address, active)| {
            let location =
                Coordinate::new(lat, lng).map_err(|e| corrupt("drop_off_points", &id, e))?;
            Ok(DropOffPoint {
                id,
                name,
                location,
                address,
                active,
            })
        })
        .collect()
}
