//! Cumulative environmental impact of a user's completed pickups.

use serde::{Deserialize, Serialize};

use super::{round2, ImpactTotals, SettlementCalculator};
use crate::types::{PickupRequest, RequestStatus};

const GREEN_SAVER_CO2_KG: f64 = 100.0;
const WATER_GUARDIAN_LITRES: f64 = 500.0;
const WASTE_WARRIOR_LANDFILL_KG: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EcoBadge {
    /// More than 100 kg CO₂ saved.
    GreenSaver,
    /// More than 500 L water conserved.
    WaterGuardian,
    /// More than 200 kg diverted from landfill.
    WasteWarrior,
    /// All three of the above.
    EcoChampion,
}

impl EcoBadge {
    /// Badges earned by an impact total. Thresholds are strict.
    pub fn earned(impact: &ImpactTotals) -> Vec<EcoBadge> {
        let mut badges = Vec::new();
        if impact.co2_kg > GREEN_SAVER_CO2_KG {
            badges.push(Self::GreenSaver);
        }
        if impact.water_litres > WATER_GUARDIAN_LITRES {
            badges.push(Self::WaterGuardian);
        }
        if impact.landfill_kg > WASTE_WARRIOR_LANDFILL_KG {
            badges.push(Self::WasteWarrior);
        }
        if badges.len() == 3 {
            badges.push(Self::EcoChampion);
        }
        badges
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub impact: ImpactTotals,
    pub total_weight_kg: f64,
    pub completed_pickups: usize,
    pub badges: Vec<EcoBadge>,
}

impl ImpactSummary {
    /// Recompute impact from the stored itemization of every completed row.
    /// Rows in any other status are ignored.
    pub fn from_requests<'a>(
        calculator: &SettlementCalculator,
        requests: impl IntoIterator<Item = &'a PickupRequest>,
    ) -> Self {
        let mut impact = ImpactTotals::default();
        let mut weight = 0.0;
        let mut completed = 0;

        for request in requests {
            if request.status != RequestStatus::Completed {
                continue;
            }
            completed += 1;
            if let Some(items) = &request.scraps {
                let s = calculator.calculate(items);
                impact.add(&s.impact);
                weight += s.total_weight_kg;
            }
        }

        let impact = impact.rounded();
        Self {
            badges: EcoBadge::earned(&impact),
            impact,
            total_weight_kg: round2(weight),
            completed_pickups: completed,
        }
    }
}
