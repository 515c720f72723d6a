use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{AvailabilityWindow, Coordinate, ScrapCategory};
use crate::errors::{DispatchError, DispatchResult};

/// A registered waste collector.
///
/// Collectors are never deleted; `active = false` takes them out of matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collector {
    pub id: String,
    pub name: String,
    pub home: Coordinate,
    pub categories: BTreeSet<ScrapCategory>,
    pub availability: AvailabilityWindow,
    pub active: bool,
}

/// Input of a collector's own setup action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorProfile {
    pub name: String,
    pub home: Coordinate,
    pub categories: BTreeSet<ScrapCategory>,
    pub availability: AvailabilityWindow,
}

impl Collector {
    /// Build an active collector from a setup profile.
    pub fn from_profile(id: impl Into<String>, profile: CollectorProfile) -> DispatchResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DispatchError::invalid("collector id is empty"));
        }
        if profile.categories.is_empty() {
            return Err(DispatchError::invalid(format!(
                "collector {id} must service at least one scrap category"
            )));
        }
        Ok(Self {
            id,
            name: profile.name,
            home: profile.home,
            categories: profile.categories,
            availability: profile.availability,
            active: true,
        })
    }

    pub fn services(&self, category: ScrapCategory) -> bool {
        self.categories.contains(&category)
    }
}
