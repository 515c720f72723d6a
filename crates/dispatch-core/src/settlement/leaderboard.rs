//! Users ranked by total weight sold through completed pickups.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::round2;
use crate::types::{PickupRequest, RequestStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: String,
    pub total_weight_kg: f64,
    pub completed_pickups: usize,
}

/// Heaviest sellers first, ties by user id. `limit = 0` means no limit.
pub fn leaderboard<'a>(
    requests: impl IntoIterator<Item = &'a PickupRequest>,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let mut totals: FxHashMap<&str, (f64, usize)> = FxHashMap::default();
    for r in requests {
        if r.status != RequestStatus::Completed {
            continue;
        }
        let entry = totals.entry(r.user_id.as_str()).or_insert((0.0, 0));
        entry.0 += r.total_weight_kg();
        entry.1 += 1;
    }

    let mut rows: Vec<(&str, f64, usize)> =
        totals.into_iter().map(|(u, (w, n))| (u, w, n)).collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    if limit > 0 {
        rows.truncate(limit);
    }

    rows.into_iter()
        .enumerate()
        .map(|(i, (user_id, weight, n))| LeaderboardEntry {
            rank: i + 1,
            user_id: user_id.to_string(),
            total_weight_kg: round2(weight),
            completed_pickups: n,
        })
        .collect()
}
