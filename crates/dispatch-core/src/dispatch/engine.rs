//! `DispatchEngine`: the request/response facade over matching, the
//! lifecycle state machine and settlement.
//!
//! The engine holds no session state: every operation takes the acting
//! identity explicitly. Status changes go exclusively through
//! `IRequestStore::conditional_update`; the engine never retries a
//! conflict or a downstream failure.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::state_machine::Transition;
use crate::config::DispatchConfig;
use crate::errors::{DispatchError, DispatchResult};
use crate::matching::{eligible_collectors, nearest_drop_off_points, MatchOutcome, Ranked};
use crate::settlement::{
    leaderboard, ImpactSummary, LeaderboardEntry, PriceTable, SettlementCalculator,
};
use crate::traits::{
    CasOutcome, ICollectorDirectory, IDropOffDirectory, IPaymentGateway, IRequestStore,
};
use crate::types::{
    Collector, CollectorProfile, Coordinate, DropOffPoint, PickupDraft, PickupRequest,
    RequestPatch, RequestStatus, ScrapItem,
};

pub struct DispatchEngine {
    config: DispatchConfig,
    calculator: SettlementCalculator,
    requests: Arc<dyn IRequestStore>,
    collectors: Arc<dyn ICollectorDirectory>,
    drop_offs: Arc<dyn IDropOffDirectory>,
    payments: Arc<dyn IPaymentGateway>,
}

impl DispatchEngine {
    /// Validate `config` and build the price table once.
    pub fn new(
        config: DispatchConfig,
        requests: Arc<dyn IRequestStore>,
        collectors: Arc<dyn ICollectorDirectory>,
        drop_offs: Arc<dyn IDropOffDirectory>,
        payments: Arc<dyn IPaymentGateway>,
    ) -> DispatchResult<Self> {
        config.validate()?;
        let table = PriceTable::from_config(&config.settlement)?;
        Ok(Self {
            config,
            calculator: SettlementCalculator::new(table),
            requests,
            collectors,
            drop_offs,
            payments,
        })
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn calculator(&self) -> &SettlementCalculator {
        &self.calculator
    }

    // ── Matching ──

    /// Rank every eligible collector for `draft`, nearest first.
    pub fn find_collectors(&self, draft: &PickupDraft) -> DispatchResult<MatchOutcome> {
        draft.validate_for_matching()?;
        let directory = self.collectors.list_collectors()?;
        let ranked = eligible_collectors(draft, &directory, self.config.matching.radius_km);

        info!(
            origin = %draft.origin,
            time = %draft.preferred_time,
            scanned = directory.len(),
            eligible = ranked.len(),
            "collector match"
        );
        Ok(MatchOutcome::from_ranked(ranked))
    }

    /// Active drop-off points, nearest first. The head is the nearest.
    pub fn nearest_drop_off_points(
        &self,
        origin: Coordinate,
    ) -> DispatchResult<Vec<Ranked<DropOffPoint>>> {
        let points = self.drop_offs.list_drop_off_points()?;
        Ok(nearest_drop_off_points(origin, points))
    }

    // ── Collector setup ──

    /// The collector's own setup action. Keeps the current active flag.
    pub fn setup_collector(
        &self,
        collector_id: &str,
        profile: CollectorProfile,
    ) -> DispatchResult<Collector> {
        let mut collector = Collector::from_profile(collector_id, profile)?;
        if let Some(existing) = self.collectors.get_collector(collector_id)? {
            collector.active = existing.active;
        }
        self.collectors.upsert_collector(&collector)?;
        info!(collector_id, categories = collector.categories.len(), "collector setup saved");
        Ok(collector)
    }

    /// Soft activation toggle; collectors are never deleted.
    pub fn set_collector_active(&self, collector_id: &str, active: bool) -> DispatchResult<Collector> {
        let mut collector = self
            .collectors
            .get_collector(collector_id)?
            .ok_or_else(|| DispatchError::collector_not_found(collector_id))?;
        collector.active = active;
        self.collectors.upsert_collector(&collector)?;
        info!(collector_id, active, "collector availability toggled");
        Ok(collector)
    }

    // ── Submission ──

    /// Fan a draft out into one `pending` row per selected collector.
    ///
    /// All rows share a submission id. Every collector is checked before
    /// the first row is written; a store failure part-way through leaves
    /// the rows already written in place and is reported to the caller.
    pub fn submit_request(
        &self,
        user_id: &str,
        draft: &PickupDraft,
        collector_ids: &[String],
    ) -> DispatchResult<Vec<PickupRequest>> {
        require_id("user", user_id)?;
        draft.validate_for_submission()?;
        if collector_ids.is_empty() {
            return Err(DispatchError::invalid("select at least one collector"));
        }

        let mut seen = HashSet::new();
        let selected: Vec<&String> = collector_ids.iter().filter(|id| seen.insert(*id)).collect();
        for id in &selected {
            let collector = self
                .collectors
                .get_collector(id)?
                .ok_or_else(|| DispatchError::collector_not_found(id))?;
            if !collector.active {
                return Err(DispatchError::invalid(format!(
                    "collector {id} is not accepting requests"
                )));
            }
        }

        let submission_id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let mut created = Vec::with_capacity(selected.len());
        for id in selected {
            let request = PickupRequest::new_pending(&submission_id, user_id, id, draft, now);
            if let Err(e) = self.requests.insert_request(&request) {
                warn!(
                    submission_id = %submission_id,
                    written = created.len(),
                    error = %e,
                    "fan-out interrupted"
                );
                return Err(e.into());
            }
            created.push(request);
        }

        info!(
            user_id,
            submission_id = %submission_id,
            rows = created.len(),
            "pickup request submitted"
        );
        Ok(created)
    }

    // ── Lifecycle ──

    pub fn accept(&self, collector_id: &str, request_id: &str) -> DispatchResult<PickupRequest> {
        self.apply_status_transition(Transition::Accept, collector_id, request_id)
    }

    pub fn reject(&self, collector_id: &str, request_id: &str) -> DispatchResult<PickupRequest> {
        self.apply_status_transition(Transition::Reject, collector_id, request_id)
    }

    /// Settle an accepted request and move it to `completed`.
    ///
    /// Order: settle (rejecting bad weights and overflowing totals), check
    /// ownership and state, capture payment (skipped for a zero total), then
    /// compare-and-set. Nothing is charged for a request that is not
    /// `accepted` at read time.
    pub fn complete(
        &self,
        collector_id: &str,
        request_id: &str,
        items: Vec<ScrapItem>,
    ) -> DispatchResult<PickupRequest> {
        let settlement = self.calculator.settle(&items)?;
        let request = self.load_owned(collector_id, request_id)?;
        let transition = Transition::Complete;
        if request.status != transition.source() {
            warn!(request_id, status = %request.status, "complete refused");
            return Err(DispatchError::StateConflict {
                request_id: request_id.to_string(),
                expected: transition.source(),
                actual: request.status,
            });
        }

        let payment_reference = if settlement.total_amount > 0.0 {
            let receipt = self.payments.capture(request_id, settlement.total_amount)?;
            Some(receipt.reference)
        } else {
            debug!(request_id, "zero total, no payment captured");
            None
        };

        let patch = RequestPatch::completion(items, settlement, payment_reference.clone());
        match self
            .requests
            .conditional_update(request_id, transition.source(), &patch)?
        {
            CasOutcome::Applied(updated) => {
                info!(
                    request_id,
                    collector_id,
                    amount = settlement.total_amount,
                    weight_kg = settlement.total_weight_kg,
                    "pickup completed"
                );
                Ok(updated)
            }
            CasOutcome::Conflict { current } => {
                warn!(
                    request_id,
                    status = %current,
                    payment_reference = payment_reference.as_deref().unwrap_or(""),
                    "completion lost race after payment capture"
                );
                Err(DispatchError::StateConflict {
                    request_id: request_id.to_string(),
                    expected: transition.source(),
                    actual: current,
                })
            }
            CasOutcome::NotFound => Err(DispatchError::request_not_found(request_id)),
        }
    }

    // ── Queries ──

    pub fn get_request(&self, request_id: &str) -> DispatchResult<PickupRequest> {
        self.requests
            .get_request(request_id)?
            .ok_or_else(|| DispatchError::request_not_found(request_id))
    }

    /// A user's requests, newest first. `limit = 0` returns all of them.
    pub fn recent_activity(&self, user_id: &str, limit: usize) -> DispatchResult<Vec<PickupRequest>> {
        require_id("user", user_id)?;
        let mut rows = self.requests.requests_for_user(user_id)?;
        if limit > 0 {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    /// Requests waiting for this collector's decision.
    pub fn pending_for_collector(&self, collector_id: &str) -> DispatchResult<Vec<PickupRequest>> {
        require_id("collector", collector_id)?;
        Ok(self
            .requests
            .requests_for_collector(collector_id, Some(RequestStatus::Pending))?)
    }

    /// Requests this collector accepted and has not completed yet.
    pub fn active_bookings(&self, collector_id: &str) -> DispatchResult<Vec<PickupRequest>> {
        require_id("collector", collector_id)?;
        Ok(self
            .requests
            .requests_for_collector(collector_id, Some(RequestStatus::Accepted))?)
    }

    /// Cumulative impact and badges over the user's completed pickups.
    pub fn user_impact(&self, user_id: &str) -> DispatchResult<ImpactSummary> {
        require_id("user", user_id)?;
        let rows = self.requests.requests_for_user(user_id)?;
        Ok(ImpactSummary::from_requests(&self.calculator, &rows))
    }

    /// Top sellers by completed weight. `limit = 0` returns everyone.
    pub fn leaderboard(&self, limit: usize) -> DispatchResult<Vec<LeaderboardEntry>> {
        let completed = self.requests.requests_with_status(RequestStatus::Completed)?;
        Ok(leaderboard(&completed, limit))
    }

    // ── Internals ──

    fn load_owned(&self, collector_id: &str, request_id: &str) -> DispatchResult<PickupRequest> {
        require_id("collector", collector_id)?;
        let request = self.get_request(request_id)?;
        if !request.is_assigned_to(collector_id) {
            return Err(DispatchError::NotAssigned {
                request_id: request_id.to_string(),
                collector_id: collector_id.to_string(),
            });
        }
        Ok(request)
    }

    fn apply_status_transition(
        &self,
        transition: Transition,
        collector_id: &str,
        request_id: &str,
    ) -> DispatchResult<PickupRequest> {
        self.load_owned(collector_id, request_id)?;

        let patch = RequestPatch::status(transition.target());
        match self
            .requests
            .conditional_update(request_id, transition.source(), &patch)?
        {
            CasOutcome::Applied(updated) => {
                info!(request_id, collector_id, %transition, "request transitioned");
                Ok(updated)
            }
            CasOutcome::Conflict { current } => {
                warn!(request_id, collector_id, %transition, status = %current, "transition conflict");
                Err(DispatchError::StateConflict {
                    request_id: request_id.to_string(),
                    expected: transition.source(),
                    actual: current,
                })
            }
            CasOutcome::NotFound => Err(DispatchError::request_not_found(request_id)),
        }
    }
}

fn require_id(kind: &str, id: &str) -> DispatchResult<()> {
    if id.trim().is_empty() {
        return Err(DispatchError::invalid(format!("{kind} id is empty")));
    }
    Ok(())
}
