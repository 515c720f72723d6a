//! Capability + temporal + spatial eligibility.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use super::ranking::{sort_ranked, Locatable, Ranked};
use crate::geo::haversine_km;
use crate::types::{Collector, Coordinate, PickupDraft, ScrapCategory};

/// An eligible collector with what it can actually take from this request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCollector {
    pub collector: Collector,
    pub distance_km: f64,
    /// Requested categories this collector services. Never empty.
    pub matching_categories: BTreeSet<ScrapCategory>,
}

/// Per-predicate verdict for one collector. Useful for explaining
/// why a collector is missing from a ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibilityCheck {
    pub matching_categories: BTreeSet<ScrapCategory>,
    pub within_window: bool,
    pub distance_km: f64,
    pub within_radius: bool,
    pub active: bool,
}

impl EligibilityCheck {
    pub fn evaluate(draft: &PickupDraft, collector: &Collector, radius_km: f64) -> Self {
        let matching_categories = draft
            .categories
            .intersection(&collector.categories)
            .copied()
            .collect();
        let distance_km = haversine_km(draft.origin, collector.home);
        Self {
            matching_categories,
            within_window: collector.availability.contains(draft.preferred_time),
            distance_km,
            within_radius: distance_km <= radius_km,
            active: collector.active,
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.active && !self.matching_categories.is_empty() && self.within_window && self.within_radius
    }
}

struct Candidate {
    collector: Collector,
    matching_categories: BTreeSet<ScrapCategory>,
}

impl Locatable for Candidate {
    fn id(&self) -> &str {
        &self.collector.id
    }
    fn location(&self) -> Coordinate {
        self.collector.home
    }
}

/// Collectors that pass every predicate, nearest first (ties by id).
///
/// The caller is expected to have validated `draft` already.
pub fn eligible_collectors(
    draft: &PickupDraft,
    collectors: &[Collector],
    radius_km: f64,
) -> Vec<RankedCollector> {
    let mut passing: Vec<Ranked<Candidate>> = collectors
        .iter()
        .filter_map(|c| {
            let check = EligibilityCheck::evaluate(draft, c, radius_km);
            if check.is_eligible() {
                return Some(Ranked {
                    item: Candidate {
                        collector: c.clone(),
                        matching_categories: check.matching_categories,
                    },
                    distance_km: check.distance_km,
                });
            }
            debug!(
                collector_id = %c.id,
                matching = check.matching_categories.len(),
                within_window = check.within_window,
                distance_km = check.distance_km,
                active = check.active,
                "collector excluded"
            );
            None
        })
        .collect();

    sort_ranked(&mut passing);
    passing
        .into_iter()
        .map(|r| RankedCollector {
            collector: r.item.collector,
            distance_km: r.distance_km,
            matching_categories: r.item.matching_categories,
        })
        .collect()
}
