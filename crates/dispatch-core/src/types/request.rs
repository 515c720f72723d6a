use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinate, RequestStatus, ScrapCategory, ScrapItem, TimeOfDay};
use crate::errors::{DispatchError, DispatchResult};
use crate::settlement::Settlement;

/// What a user asks for before choosing collectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PickupDraft {
    pub origin: Coordinate,
    pub categories: BTreeSet<ScrapCategory>,
    pub preferred_date: NaiveDate,
    pub preferred_time: TimeOfDay,
    pub pickup_address: String,
}

impl PickupDraft {
    /// Checks needed before matching.
    pub fn validate_for_matching(&self) -> DispatchResult<()> {
        if self.categories.is_empty() {
            return Err(DispatchError::invalid(
                "pickup request must name at least one scrap category",
            ));
        }
        Ok(())
    }

    /// Checks needed before rows are written.
    pub fn validate_for_submission(&self) -> DispatchResult<()> {
        self.validate_for_matching()?;
        if self.pickup_address.trim().is_empty() {
            return Err(DispatchError::invalid("pickup address is empty"));
        }
        Ok(())
    }
}

/// One fan-out row: a user's request addressed to exactly one collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupRequest {
    pub id: String,
    /// Shared by every row created from the same submission.
    pub submission_id: String,
    pub user_id: String,
    pub collector_id: Option<String>,
    pub origin: Coordinate,
    pub categories: BTreeSet<ScrapCategory>,
    pub preferred_date: NaiveDate,
    pub preferred_time: TimeOfDay,
    pub pickup_address: String,
    pub status: RequestStatus,
    pub scraps: Option<Vec<ScrapItem>>,
    pub settlement: Option<Settlement>,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PickupRequest {
    /// A fresh `pending` row for one selected collector.
    pub fn new_pending(
        submission_id: &str,
        user_id: &str,
        collector_id: &str,
        draft: &PickupDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            submission_id: submission_id.to_string(),
            user_id: user_id.to_string(),
            collector_id: Some(collector_id.to_string()),
            origin: draft.origin,
            categories: draft.categories.clone(),
            preferred_date: draft.preferred_date,
            preferred_time: draft.preferred_time,
            pickup_address: draft.pickup_address.clone(),
            status: RequestStatus::Pending,
            scraps: None,
            settlement: None,
            payment_reference: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_assigned_to(&self, collector_id: &str) -> bool {
        self.collector_id.as_deref() == Some(collector_id)
    }

    /// Total measured weight, zero until completion.
    pub fn total_weight_kg(&self) -> f64 {
        self.scraps
            .as_ref()
            .map(|items| items.iter().map(|i| i.weight_kg).sum())
            .unwrap_or(0.0)
    }

    /// Apply a patch in place. Stores call this only after their
    /// compare-and-set guard has passed.
    pub fn apply(&mut self, patch: RequestPatch, now: DateTime<Utc>) {
        self.status = patch.status;
        if patch.scraps.is_some() {
            self.scraps = patch.scraps;
        }
        if patch.settlement.is_some() {
            self.settlement = patch.settlement;
        }
        if patch.payment_reference.is_some() {
            self.payment_reference = patch.payment_reference;
        }
        self.updated_at = now;
    }
}

/// The only mutation a store accepts for an existing request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPatch {
    pub status: RequestStatus,
    pub scraps: Option<Vec<ScrapItem>>,
    pub settlement: Option<Settlement>,
    pub payment_reference: Option<String>,
}

impl RequestPatch {
    pub fn status(status: RequestStatus) -> Self {
        Self {
            status,
            scraps: None,
            settlement: None,
            payment_reference: None,
        }
    }

    pub fn completion(
        scraps: Vec<ScrapItem>,
        settlement: Settlement,
        payment_reference: Option<String>,
    ) -> Self {
        Self {
            status: RequestStatus::Completed,
            scraps: Some(scraps),
            settlement: Some(settlement),
            payment_reference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PickupDraft {
        PickupDraft {
            origin: Coordinate::new(0.0, 0.05).unwrap(),
            categories: [ScrapCategory::Plastic].into_iter().collect(),
            preferred_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            preferred_time: "10:00".parse().unwrap(),
            pickup_address: "12 Market Road".into(),
        }
    }

    #[test]
    fn test_new_pending_is_assigned_and_pending() {
        let r = PickupRequest::new_pending("s1", "u1", "c1", &draft(), Utc::now());
        assert_eq!(r.status, RequestStatus::Pending);
        assert!(r.is_assigned_to("c1"));
        assert!(!r.is_assigned_to("c2"));
        assert_eq!(r.total_weight_kg(), 0.0);
    }

    #[test]
    fn test_empty_categories_rejected() {
        let mut d = draft();
        d.categories.clear();
        assert!(d.validate_for_matching().is_err());
    }

    #[test]
    fn test_blank_address_rejected_only_for_submission() {
        let mut d = draft();
        d.pickup_address = "  ".into();
        assert!(d.validate_for_matching().is_ok());
        assert!(d.validate_for_submission().is_err());
    }

    #[test]
    fn test_unknown_draft_fields_rejected() {
        let json = r#"{
            "origin": {"lat": 0.0, "lng": 0.0},
            "categories": ["Plastic"],
            "preferred_date": "2026-03-14",
            "preferred_time": "10:00",
            "pickup_address": "x",
            "collectorName": "legacy"
        }"#;
        assert!(serde_json::from_str::<PickupDraft>(json).is_err());
    }
}
