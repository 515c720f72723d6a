//! # dispatch-core
//!
//! Foundation crate for the pickup dispatch engine.
//! Matches pickup requests to eligible collectors, governs the request
//! lifecycle through a compare-and-set state machine, and computes the
//! settlement amount and environmental impact at completion.
//!
//! ## Modules
//! - `config`: DispatchConfig (matching, settlement, storage, logging) from TOML
//! - `errors`: DispatchError, StorageError, ErrorKind, RecoveryAction
//! - `types`: Coordinate, ScrapCategory, Collector, PickupRequest, DropOffPoint
//! - `traits`: directory / request store / payment / geocoder contracts + test doubles
//! - `geo`: great-circle distance
//! - `matching`: eligibility filter and distance ranking
//! - `settlement`: price/impact table, calculator, per-user impact, leaderboard
//! - `dispatch`: state machine and the `DispatchEngine` facade
//! - `tracing`: subscriber setup

pub mod config;
pub mod dispatch;
pub mod errors;
pub mod geo;
pub mod matching;
pub mod settlement;
pub mod tracing;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::DispatchConfig;
pub use dispatch::DispatchEngine;
pub use errors::{DispatchError, DispatchResult, StorageError};
pub use matching::{MatchOutcome, RankedCollector};
pub use settlement::{PriceTable, Settlement, SettlementCalculator};
pub use types::{
    Collector, Coordinate, DropOffPoint, PickupDraft, PickupRequest, RequestStatus,
    ScrapCategory, ScrapItem, TimeOfDay,
};
