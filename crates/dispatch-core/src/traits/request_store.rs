//! `IRequestStore`: persistence contract for pickup request rows.
//!
//! `conditional_update` is the only sanctioned way to change a stored
//! request. Implementations must evaluate the expected-status guard and
//! the write atomically in the persistence layer, so that independent
//! service instances sharing the store still see a single winner.

use std::sync::Arc;

use crate::errors::StorageError;
use crate::types::{PickupRequest, RequestPatch, RequestStatus};

/// Result of a compare-and-set status update.
#[derive(Debug, Clone, PartialEq)]
pub enum CasOutcome {
    /// The guard held and the patch was written. Carries the stored row.
    Applied(PickupRequest),
    /// The row exists but its status no longer matches the expectation.
    Conflict { current: RequestStatus },
    NotFound,
}

pub trait IRequestStore: Send + Sync {
    /// Insert a new row. Fails with `StorageError::Duplicate` on id reuse.
    fn insert_request(&self, request: &PickupRequest) -> Result<(), StorageError>;

    fn get_request(&self, id: &str) -> Result<Option<PickupRequest>, StorageError>;

    /// Apply `patch` only if the stored status still equals `expected`.
    fn conditional_update(
        &self,
        id: &str,
        expected: RequestStatus,
        patch: &RequestPatch,
    ) -> Result<CasOutcome, StorageError>;

    /// Every row owned by a user, newest first.
    fn requests_for_user(&self, user_id: &str) -> Result<Vec<PickupRequest>, StorageError>;

    /// Rows assigned to a collector, optionally filtered by status, newest first.
    fn requests_for_collector(
        &self,
        collector_id: &str,
        status: Option<RequestStatus>,
    ) -> Result<Vec<PickupRequest>, StorageError>;

    /// Every row in the given status, newest first.
    fn requests_with_status(&self, status: RequestStatus)
        -> Result<Vec<PickupRequest>, StorageError>;
}

impl<T: IRequestStore + ?Sized> IRequestStore for Arc<T> {
    fn insert_request(&self, request: &PickupRequest) -> Result<(), StorageError> {
        (**self).insert_request(request)
    }
    fn get_request(&self, id: &str) -> Result<Option<PickupRequest>, StorageError> {
        (**self).get_request(id)
    }
    fn conditional_update(
        &self,
        id: &str,
        expected: RequestStatus,
        patch: &RequestPatch,
    ) -> Result<CasOutcome, StorageError> {
        (**self).conditional_update(id, expected, patch)
    }
    fn requests_for_user(&self, user_id: &str) -> Result<Vec<PickupRequest>, StorageError> {
        (**self).requests_for_user(user_id)
    }
    fn requests_for_collector(
        &self,
        collector_id: &str,
        status: Option<RequestStatus>,
    ) -> Result<Vec<PickupRequest>, StorageError> {
        (**self).requests_for_collector(collector_id, status)
    }
    fn requests_with_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<PickupRequest>, StorageError> {
        (**self).requests_with_status(status)
    }
}
