//! In-memory test doubles for every collaborator trait.
//!
//! Used by engine tests to avoid a real database. The request store runs
//! its compare-and-set under one lock, which is the in-process analogue
//! of the SQLite conditional update.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use super::directory::{ICollectorDirectory, IDropOffDirectory};
use super::geocoder::IGeocoder;
use super::payment::{IPaymentGateway, PaymentReceipt};
use super::request_store::{CasOutcome, IRequestStore};
use crate::errors::{DispatchError, DispatchResult, StorageError};
use crate::types::{Collector, Coordinate, DropOffPoint, PickupRequest, RequestPatch, RequestStatus};

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    m.lock().map_err(|e| StorageError::LockPoisoned(e.to_string()))
}

fn newest_first(mut rows: Vec<PickupRequest>) -> Vec<PickupRequest> {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    rows
}

// ─── Request store ──────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryRequestStore {
    rows: Mutex<HashMap<String, PickupRequest>>,
    unavailable: AtomicBool,
}

impl InMemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StorageError::DbBusy`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::DbBusy);
        }
        Ok(())
    }

    fn filtered(
        &self,
        keep: impl Fn(&PickupRequest) -> bool,
    ) -> Result<Vec<PickupRequest>, StorageError> {
        self.check()?;
        let rows = lock(&self.rows)?;
        Ok(newest_first(rows.values().filter(|r| keep(r)).cloned().collect()))
    }
}

impl IRequestStore for InMemoryRequestStore {
    fn insert_request(&self, request: &PickupRequest) -> Result<(), StorageError> {
        self.check()?;
        let mut rows = lock(&self.rows)?;
        if rows.contains_key(&request.id) {
            return Err(StorageError::Duplicate {
                table: "pickup_requests",
                id: request.id.clone(),
            });
        }
        rows.insert(request.id.clone(), request.clone());
        Ok(())
    }

    fn get_request(&self, id: &str) -> Result<Option<PickupRequest>, StorageError> {
        self.check()?;
        Ok(lock(&self.rows)?.get(id).cloned())
    }

    fn conditional_update(
        &self,
        id: &str,
        expected: RequestStatus,
        patch: &RequestPatch,
    ) -> Result<CasOutcome, StorageError> {
        self.check()?;
        let mut rows = lock(&self.rows)?;
        let Some(row) = rows.get_mut(id) else {
            return Ok(CasOutcome::NotFound);
        };
        if row.status != expected {
            return Ok(CasOutcome::Conflict {
                current: row.status,
            });
        }
        row.apply(patch.clone(), Utc::now());
        Ok(CasOutcome::Applied(row.clone()))
    }

    fn requests_for_user(&self, user_id: &str) -> Result<Vec<PickupRequest>, StorageError> {
        self.filtered(|r| r.user_id == user_id)
    }

    fn requests_for_collector(
        &self,
        collector_id: &str,
        status: Option<RequestStatus>,
    ) -> Result<Vec<PickupRequest>, StorageError> {
        self.filtered(|r| r.is_assigned_to(collector_id) && status.map_or(true, |s| r.status == s))
    }

    fn requests_with_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<PickupRequest>, StorageError> {
        self.filtered(|r| r.status == status)
    }
}

// ─── Directory ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryDirectory {
    collectors: Mutex<HashMap<String, Collector>>,
    drop_offs: Mutex<HashMap<String, DropOffPoint>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collectors(collectors: impl IntoIterator<Item = Collector>) -> Self {
        let dir = Self::new();
        if let Ok(mut map) = dir.collectors.lock() {
            map.extend(collectors.into_iter().map(|c| (c.id.clone(), c)));
        }
        dir
    }
}

impl ICollectorDirectory for InMemoryDirectory {
    fn list_collectors(&self) -> Result<Vec<Collector>, StorageError> {
        let mut all: Vec<Collector> = lock(&self.collectors)?.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    fn get_collector(&self, id: &str) -> Result<Option<Collector>, StorageError> {
        Ok(lock(&self.collectors)?.get(id).cloned())
    }

    fn upsert_collector(&self, collector: &Collector) -> Result<(), StorageError> {
        lock(&self.collectors)?.insert(collector.id.clone(), collector.clone());
        Ok(())
    }
}

impl IDropOffDirectory for InMemoryDirectory {
    fn list_drop_off_points(&self) -> Result<Vec<DropOffPoint>, StorageError> {
        Ok(lock(&self.drop_offs)?.values().cloned().collect())
    }

    fn upsert_drop_off_point(&self, point: &DropOffPoint) -> Result<(), StorageError> {
        lock(&self.drop_offs)?.insert(point.id.clone(), point.clone());
        Ok(())
    }
}

// ─── Payment ────────────────────────────────────────────────────────

/// Records every capture; repeated keys return the first receipt.
#[derive(Default)]
pub struct StubPaymentGateway {
    captures: Mutex<Vec<(String, f64)>>,
    receipts: Mutex<HashMap<String, PaymentReceipt>>,
    failing: AtomicBool,
}

impl StubPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// `(idempotency_key, amount)` of every distinct capture.
    pub fn captures(&self) -> Vec<(String, f64)> {
        self.captures.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl IPaymentGateway for StubPaymentGateway {
    fn capture(&self, idempotency_key: &str, amount: f64) -> DispatchResult<PaymentReceipt> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DispatchError::PaymentUnavailable {
                reason: "stub gateway set to fail".to_string(),
            });
        }
        let mut receipts = self.receipts.lock().map_err(|e| DispatchError::PaymentUnavailable {
            reason: e.to_string(),
        })?;
        if let Some(existing) = receipts.get(idempotency_key) {
            return Ok(existing.clone());
        }
        let receipt = PaymentReceipt {
            reference: format!("pay-{}", uuid::Uuid::new_v4()),
        };
        receipts.insert(idempotency_key.to_string(), receipt.clone());
        if let Ok(mut captures) = self.captures.lock() {
            captures.push((idempotency_key.to_string(), amount));
        }
        Ok(receipt)
    }
}

// ─── Geocoder ───────────────────────────────────────────────────────

/// Exact-match address lookup.
#[derive(Default)]
pub struct StaticGeocoder {
    known: HashMap<String, Coordinate>,
}

impl StaticGeocoder {
    pub fn new(known: impl IntoIterator<Item = (String, Coordinate)>) -> Self {
        Self {
            known: known.into_iter().collect(),
        }
    }
}

impl IGeocoder for StaticGeocoder {
    fn geocode(&self, address: &str) -> DispatchResult<Option<Coordinate>> {
        Ok(self.known.get(address.trim()).copied())
    }
}
