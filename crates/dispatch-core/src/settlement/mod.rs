//! Settlement: price and environmental impact of a completed pickup,
//! plus the per-user aggregates built on top of it.

pub mod calculator;
pub mod impact;
pub mod leaderboard;
pub mod price_table;

pub use calculator::{round2, validate_itemization, ImpactTotals, Settlement, SettlementCalculator};
pub use impact::{EcoBadge, ImpactSummary};
pub use leaderboard::{leaderboard, LeaderboardEntry};
pub use price_table::{CategoryRates, PriceTable};
