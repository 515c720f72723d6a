//! Closed entity schema for the dispatch engine.
//!
//! Every boundary type validates on construction and on deserialization,
//! so a value that exists is a value the engine can trust.

mod collector;
mod coordinate;
mod drop_off;
mod request;
mod scrap;
mod status;
mod time_of_day;

pub use collector::{Collector, CollectorProfile};
pub use coordinate::Coordinate;
pub use drop_off::DropOffPoint;
pub use request::{PickupDraft, PickupRequest, RequestPatch};
pub use scrap::{ScrapCategory, ScrapItem};
pub use status::RequestStatus;
pub use time_of_day::{AvailabilityWindow, TimeOfDay};
