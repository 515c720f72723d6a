//! Eligibility filter and distance ranking.
//!
//! Collectors and drop-off points share one ordering: nearest first, ties
//! by id. Collectors reuse the distance their eligibility check measured.

pub mod eligibility;
pub mod ranking;

use serde::Serialize;

pub use eligibility::{eligible_collectors, EligibilityCheck, RankedCollector};
pub use ranking::{nearest_drop_off_points, rank_by_distance, Locatable, Ranked};

/// Result of matching a request against the directory.
///
/// An empty match is a legitimate outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MatchOutcome {
    Candidates(Vec<RankedCollector>),
    NoEligibleCollector,
}

impl MatchOutcome {
    pub fn from_ranked(ranked: Vec<RankedCollector>) -> Self {
        if ranked.is_empty() {
            Self::NoEligibleCollector
        } else {
            Self::Candidates(ranked)
        }
    }

    pub fn candidates(&self) -> &[RankedCollector] {
        match self {
            Self::Candidates(c) => c,
            Self::NoEligibleCollector => &[],
        }
    }

    pub fn nearest(&self) -> Option<&RankedCollector> {
        self.candidates().first()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoEligibleCollector)
    }
}
