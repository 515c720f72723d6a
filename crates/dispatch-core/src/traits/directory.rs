//! Directory reads (and the collector's own setup write).

use std::sync::Arc;

use crate::errors::StorageError;
use crate::types::{Collector, DropOffPoint};

/// Collector directory.
pub trait ICollectorDirectory: Send + Sync {
    /// Snapshot of every registered collector, active or not.
    fn list_collectors(&self) -> Result<Vec<Collector>, StorageError>;

    fn get_collector(&self, id: &str) -> Result<Option<Collector>, StorageError>;

    /// Insert or replace a collector record.
    fn upsert_collector(&self, collector: &Collector) -> Result<(), StorageError>;
}

/// Drop-off point directory.
pub trait IDropOffDirectory: Send + Sync {
    fn list_drop_off_points(&self) -> Result<Vec<DropOffPoint>, StorageError>;

    fn upsert_drop_off_point(&self, point: &DropOffPoint) -> Result<(), StorageError>;
}

impl<T: ICollectorDirectory + ?Sized> ICollectorDirectory for Arc<T> {
    fn list_collectors(&self) -> Result<Vec<Collector>, StorageError> {
        (**self).list_collectors()
    }
    fn get_collector(&self, id: &str) -> Result<Option<Collector>, StorageError> {
        (**self).get_collector(id)
    }
    fn upsert_collector(&self, collector: &Collector) -> Result<(), StorageError> {
        (**self).upsert_collector(collector)
    }
}

impl<T: IDropOffDirectory + ?Sized> IDropOffDirectory for Arc<T> {
    fn list_drop_off_points(&self) -> Result<Vec<DropOffPoint>, StorageError> {
        (**self).list_drop_off_points()
    }
    fn upsert_drop_off_point(&self, point: &DropOffPoint) -> Result<(), StorageError> {
        (**self).upsert_drop_off_point(point)
    }
}
