//! Address → coordinate collaborator, used upstream of the engine.
//!
//! The engine itself only ever receives coordinates.

use std::sync::Arc;

use crate::errors::{DispatchError, DispatchResult};
use crate::types::Coordinate;

pub trait IGeocoder: Send + Sync {
    /// `Ok(None)` when the address has no match. Transport failures surface
    /// as `DispatchError::GeocoderUnavailable`.
    fn geocode(&self, address: &str) -> DispatchResult<Option<Coordinate>>;
}

impl<T: IGeocoder + ?Sized> IGeocoder for Arc<T> {
    fn geocode(&self, address: &str) -> DispatchResult<Option<Coordinate>> {
        (**self).geocode(address)
    }
}

/// Resolve a free-text address into a request origin.
pub fn resolve_origin(geocoder: &dyn IGeocoder, address: &str) -> DispatchResult<Coordinate> {
    if address.trim().is_empty() {
        return Err(DispatchError::invalid("address is empty"));
    }
    geocoder
        .geocode(address)?
        .ok_or_else(|| DispatchError::NotFound {
            entity: "address",
            id: address.to_string(),
        })
}
