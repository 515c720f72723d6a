//! pickup_requests table queries, including the compare-and-set update.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use dispatch_core::errors::StorageError;
use dispatch_core::settlement::Settlement;
use dispatch_core::traits::CasOutcome;
use dispatch_core::types::{
    Coordinate, PickupRequest, RequestPatch, RequestStatus, ScrapCategory, ScrapItem, TimeOfDay,
};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior};

use super::{corrupt, format_ts, from_json, parse_ts, sqe, to_json};

const TABLE: &str = "pickup_requests";

const SELECT_COLUMNS: &str = "SELECT id, submission_id, user_id, collector_id, origin_lat,
        origin_lng, categories, preferred_date, preferred_time, pickup_address, status,
        scraps, settlement, payment_reference, created_at, updated_at
    FROM pickup_requests";

/// Newest first; id breaks ties between rows of the same submission.
const ORDER: &str = "ORDER BY created_at DESC, id ASC";

/// A pickup_requests row as stored.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub id: String,
    pub submission_id: String,
    pub user_id: String,
    pub collector_id: Option<String>,
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub categories: String,
    pub preferred_date: String,
    pub preferred_time: String,
    pub pickup_address: String,
    pub status: String,
    pub scraps: Option<String>,
    pub settlement: Option<String>,
    pub payment_reference: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl RequestRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            submission_id: row.get(1)?,
            user_id: row.get(2)?,
            collector_id: row.get(3)?,
            origin_lat: row.get(4)?,
            origin_lng: row.get(5)?,
            categories: row.get(6)?,
            preferred_date: row.get(7)?,
            preferred_time: row.get(8)?,
            pickup_address: row.get(9)?,
            status: row.get(10)?,
            scraps: row.get(11)?,
            settlement: row.get(12)?,
            payment_reference: row.get(13)?,
            created_at: row.get(14)?,
            updated_at: row.get(15)?,
        })
    }

    pub fn into_request(self) -> Result<PickupRequest, StorageError> {
        let id = self.id.as_str();
        let origin =
            Coordinate::new(self.origin_lat, self.origin_lng).map_err(|e| corrupt(TABLE, id, e))?;
        let categories: BTreeSet<ScrapCategory> = from_json(TABLE, id, &self.categories)?;
        let preferred_date = NaiveDate::parse_from_str(&self.preferred_date, "%Y-%m-%d")
            .map_err(|e| corrupt(TABLE, id, format!("date {:?}: {e}", self.preferred_date)))?;
        let preferred_time: TimeOfDay =
            self.preferred_time.parse().map_err(|e| corrupt(TABLE, id, e))?;
        let status: RequestStatus = self.status.parse().map_err(|e| corrupt(TABLE, id, e))?;
        let scraps: Option<Vec<ScrapItem>> = self
            .scraps
            .as_deref()
            .map(|text| from_json(TABLE, id, text))
            .transpose()?;
        let settlement: Option<Settlement> = self
            .settlement
            .as_deref()
            .map(|text| from_json(TABLE, id, text))
            .transpose()?;
        let created_at = parse_ts(TABLE, id, &self.created_at)?;
        let updated_at = parse_ts(TABLE, id, &self.updated_at)?;

        Ok(PickupRequest {
            id: self.id,
            submission_id: self.submission_id,
            user_id: self.user_id,
            collector_id: self.collector_id,
            origin,
            categories,
            preferred_date,
            preferred_time,
            pickup_address: self.pickup_address,
            status,
            scraps,
            settlement,
            payment_reference: self.payment_reference,
            created_at,
            updated_at,
        })
    }
}

pub fn insert_request(conn: &Connection, r: &PickupRequest) -> Result<(), StorageError> {
    let categories = to_json(TABLE, &r.id, &r.categories)?;
    let scraps = r.scraps.as_ref().map(|s| to_json(TABLE, &r.id, s)).transpose()?;
    let settlement = r.settlement.as_ref().map(|s| to_json(TABLE, &r.id, s)).transpose()?;

    let result = conn
        .prepare_cached(
            "INSERT INTO pickup_requests
             (id, submission_id, user_id, collector_id, origin_lat, origin_lng, categories,
              preferred_date, preferred_time, pickup_address, status, scraps, settlement,
              payment_reference, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        )
        .map_err(sqe)?
        .execute(params![
            r.id,
            r.submission_id,
            r.user_id,
            r.collector_id,
            r.origin.lat(),
            r.origin.lng(),
            categories,
            r.preferred_date.format("%Y-%m-%d").to_string(),
            r.preferred_time.to_string(),
            r.pickup_address,
            r.status.as_str(),
            scraps,
            settlement,
            r.payment_reference,
            format_ts(r.created_at),
            format_ts(r.updated_at),
        ]);

    match result {
        Ok(_) => Ok(()),
        Err(e) if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => {
            Err(StorageError::Duplicate {
                table: TABLE,
                id: r.id.clone(),
            })
        }
        Err(e) => Err(sqe(e)),
    }
}

pub fn get_request(conn: &Connection, id: &str) -> Result<Option<PickupRequest>, StorageError> {
    let record = conn
        .prepare_cached(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
        .map_err(sqe)?
        .query_row(params![id], RequestRecord::from_row)
        .optional()
        .map_err(sqe)?;
    record.map(RequestRecord::into_request).transpose()
}

fn query_requests(
    conn: &Connection,
    filter: &str,
    args: impl rusqlite::Params,
) -> Result<Vec<PickupRequest>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!("{SELECT_COLUMNS} WHERE {filter} {ORDER}"))
        .map_err(sqe)?;
    let records = stmt
        .query_map(args, RequestRecord::from_row)
        .map_err(sqe)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(sqe)?;
    records.into_iter().map(RequestRecord::into_request).collect()
}

pub fn requests_for_user(conn: &Connection, user_id: &str) -> Result<Vec<PickupRequest>, StorageError> {
    query_requests(conn, "user_id = ?1", params![user_id])
}

pub fn requests_for_collector(
    conn: &Connection,
    collector_id: &str,
    status: Option<RequestStatus>,
) -> Result<Vec<PickupRequest>, StorageError> {
    match status {
        Some(s) => query_requests(
            conn,
            "collector_id = ?1 AND status = ?2",
            params![collector_id, s.as_str()],
        ),
        None => query_requests(conn, "collector_id = ?1", params![collector_id]),
    }
}

pub fn requests_with_status(
    conn: &Connection,
    status: RequestStatus,
) -> Result<Vec<PickupRequest>, StorageError> {
    query_requests(conn, "status = ?1", params![status.as_str()])
}

/// Apply `patch` only if the row is still in `expected`.
///
/// Runs inside `BEGIN IMMEDIATE`, so the guard, the write and the
/// follow-up read see one consistent snapshot even when another process
/// holds a connection to the same file. Exactly one of several racing
/// callers observes `Applied`.
pub fn conditional_update(
    conn: &Connection,
    id: &str,
    expected: RequestStatus,
    patch: &RequestPatch,
    now: DateTime<Utc>,
) -> Result<CasOutcome, StorageError> {
    let scraps = patch.scraps.as_ref().map(|s| to_json(TABLE, id, s)).transpose()?;
    let settlement = patch.settlement.as_ref().map(|s| to_json(TABLE, id, s)).transpose()?;

    let tx = rusqlite::Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(sqe)?;

    let changed = tx
        .prepare_cached(
            "UPDATE pickup_requests SET
                status = ?3,
                scraps = COALESCE(?4, scraps),
                settlement = COALESCE(?5, settlement),
                payment_reference = COALESCE(?6, payment_reference),
                updated_at = ?7
             WHERE id = ?1 AND status = ?2",
        )
        .map_err(sqe)?
        .execute(params![
            id,
            expected.as_str(),
            patch.status.as_str(),
            scraps,
            settlement,
            patch.payment_reference,
            format_ts(now),
        ])
        .map_err(sqe)?;

    let outcome = if changed == 1 {
        match get_request(&tx, id)? {
            Some(updated) => CasOutcome::Applied(updated),
            None => CasOutcome::NotFound,
        }
    } else {
        let current: Option<String> = tx
            .prepare_cached("SELECT status FROM pickup_requests WHERE id = ?1")
            .map_err(sqe)?
            .query_row(params![id], |row| row.get(0))
            .optional()
            .map_err(sqe)?;
        match current {
            Some(s) => CasOutcome::Conflict {
                current: s.parse().map_err(|e| corrupt(TABLE, id, e))?,
            },
            None => CasOutcome::NotFound,
        }
    };

    tx.commit().map_err(sqe)?;
    Ok(outcome)
}
