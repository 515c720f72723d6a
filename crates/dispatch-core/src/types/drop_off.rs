use serde::{Deserialize, Serialize};

use super::Coordinate;

/// A fixed drop-off point. Read-only to the engine; ranked by distance only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropOffPoint {
    pub id: String,
    pub name: String,
    pub location: Coordinate,
    pub address: String,
    pub active: bool,
}
