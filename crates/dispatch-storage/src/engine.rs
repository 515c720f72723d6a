//! `DispatchStorageEngine`: the SQLite implementation of every storage
//! trait `dispatch-core` defines.
//!
//! All reads go through `with_reader()`, all writes through `with_writer()`.
//! No code outside this module touches a raw `&Connection`.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use dispatch_core::config::StorageConfig;
use dispatch_core::errors::StorageError;
use dispatch_core::traits::{CasOutcome, ICollectorDirectory, IDropOffDirectory, IRequestStore};
use dispatch_core::types::{Collector, DropOffPoint, PickupRequest, RequestPatch, RequestStatus};
use tracing::{debug, info};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries;

pub struct DispatchStorageEngine {
    pool: ConnectionPool,
}

impl DispatchStorageEngine {
    /// Open a file-backed engine. Runs migrations and applies pragmas.
    pub fn open(path: &Path, read_pool_size: usize) -> Result<Self, StorageError> {
        let pool = ConnectionPool::open(path, read_pool_size, |conn| {
            migrations::migrate(conn).map(|_| ())
        })?;
        info!(path = %path.display(), readers = pool.reader_count(), "dispatch store opened");
        Ok(Self { pool })
    }

    /// Open an in-memory engine (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let pool = ConnectionPool::open_in_memory(|conn| migrations::migrate(conn).map(|_| ()))?;
        Ok(Self { pool })
    }

    /// File-backed when `db_path` is set, in-memory otherwise.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        match &config.db_path {
            Some(path) => Self::open(Path::new(path), config.read_pool_size),
            None => Self::open_in_memory(),
        }
    }

    pub fn schema_version(&self) -> Result<u32, StorageError> {
        self.pool.with_reader(migrations::get_schema_version)
    }

    /// Database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.pool.path()
    }

    pub fn is_wal_mode(&self) -> bool {
        self.pool.is_wal_mode()
    }

    /// Expose as `Arc<dyn IRequestStore>` for engine wiring.
    pub fn as_request_store(self: &Arc<Self>) -> Arc<dyn IRequestStore> {
        Arc::clone(self) as Arc<dyn IRequestStore>
    }

    pub fn as_collector_directory(self: &Arc<Self>) -> Arc<dyn ICollectorDirectory> {
        Arc::clone(self) as Arc<dyn ICollectorDirectory>
    }

    pub fn as_drop_off_directory(self: &Arc<Self>) -> Arc<dyn IDropOffDirectory> {
        Arc::clone(self) as Arc<dyn IDropOffDirectory>
    }
}

impl IRequestStore for DispatchStorageEngine {
    fn insert_request(&self, request: &PickupRequest) -> Result<(), StorageError> {
        self.pool
            .with_writer(|conn| queries::requests::insert_request(conn, request))
    }

    fn get_request(&self, id: &str) -> Result<Option<PickupRequest>, StorageError> {
        self.pool
            .with_reader(|conn| queries::requests::get_request(conn, id))
    }

    fn conditional_update(
        &self,
        id: &str,
        expected: RequestStatus,
        patch: &RequestPatch,
    ) -> Result<CasOutcome, StorageError> {
        let outcome = self.pool.with_writer(|conn| {
            queries::requests::conditional_update(conn, id, expected, patch, Utc::now())
        })?;
        debug!(
            request_id = id,
            expected = %expected,
            target = %patch.status,
            applied = matches!(outcome, CasOutcome::Applied(_)),
            "conditional update"
        );
        Ok(outcome)
    }

    fn requests_for_user(&self, user_id: &str) -> Result<Vec<PickupRequest>, StorageError> {
        self.pool
            .with_reader(|conn| queries::requests::requests_for_user(conn, user_id))
    }

    fn requests_for_collector(
        &self,
        collector_id: &str,
        status: Option<RequestStatus>,
    ) -> Result<Vec<PickupRequest>, StorageError> {
        self.pool.with_reader(|conn| {
            queries::requests::requests_for_collector(conn, collector_id, status)
        })
    }

    fn requests_with_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<PickupRequest>, StorageError> {
        self.pool
            .with_reader(|conn| queries::requests::requests_with_status(conn, status))
    }
}

impl ICollectorDirectory for DispatchStorageEngine {
    fn list_collectors(&self) -> Result<Vec<Collector>, StorageError> {
        self.pool.with_reader(queries::collectors::list_collectors)
    }

    fn get_collector(&self, id: &str) -> Result<Option<Collector>, StorageError> {
        self.pool
            .with_reader(|conn| queries::collectors::get_collector(conn, id))
    }

    fn upsert_collector(&self, collector: &Collector) -> Result<(), StorageError> {
        self.pool
            .with_writer(|conn| queries::collectors::upsert_collector(conn, collector))
    }
}

impl IDropOffDirectory for DispatchStorageEngine {
    fn list_drop_off_points(&self) -> Result<Vec<DropOffPoint>, StorageError> {
        self.pool.with_reader(queries::drop_offs::list_drop_off_points)
    }

    fn upsert_drop_off_point(&self, point: &DropOffPoint) -> Result<(), StorageError> {
        self.pool
            .with_writer(|conn| queries::drop_offs::upsert_drop_off_point(conn, point))
    }
}
