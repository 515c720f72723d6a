//! Collaborator contracts consumed by the engine.
//!
//! These traits define the boundary between dispatch logic and whatever
//! backs it. The SQLite implementation lives in `dispatch-storage`;
//! in-memory doubles live in `test_helpers`. All traits are object-safe,
//! `Send + Sync`, and have blanket `Arc<T>` impls.

pub mod directory;
pub mod geocoder;
pub mod payment;
pub mod request_store;
pub mod test_helpers;

pub use directory::{ICollectorDirectory, IDropOffDirectory};
pub use geocoder::{resolve_origin, IGeocoder};
pub use payment::{IPaymentGateway, PaymentReceipt};
pub use request_store::{CasOutcome, IRequestStore};
