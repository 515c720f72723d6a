//! Settlement calculator: Σ weight × rate, per price and per impact dimension.

use serde::{Deserialize, Serialize};

use super::PriceTable;
use crate::errors::{DispatchError, DispatchResult};
use crate::types::ScrapItem;

/// Round to two decimal places (currency precision).
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Environmental impact, summed independently per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImpactTotals {
    pub co2_kg: f64,
    pub water_litres: f64,
    pub landfill_kg: f64,
}

impl ImpactTotals {
    pub fn add(&mut self, other: &ImpactTotals) {
        self.co2_kg += other.co2_kg;
        self.water_litres += other.water_litres;
        self.landfill_kg += other.landfill_kg;
    }

    /// Display copy rounded to two decimals.
    pub fn rounded(&self) -> Self {
        Self {
            co2_kg: round2(self.co2_kg),
            water_litres: round2(self.water_litres),
            landfill_kg: round2(self.landfill_kg),
        }
    }
}

/// Output of a completion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Settlement {
    /// Σ weight × unit price, rounded to two decimals.
    pub total_amount: f64,
    pub total_weight_kg: f64,
    pub impact: ImpactTotals,
}

/// Reject itemizations the calculator must never see.
pub fn validate_itemization(items: &[ScrapItem]) -> DispatchResult<()> {
    for item in items {
        if !item.weight_kg.is_finite() {
            return Err(DispatchError::invalid(format!(
                "weight for {} is not a number",
                item.category
            )));
        }
        if item.weight_kg < 0.0 {
            return Err(DispatchError::invalid(format!(
                "negative weight {} kg for {}",
                item.weight_kg, item.category
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct SettlementCalculator {
    table: PriceTable,
}

impl SettlementCalculator {
    pub fn new(table: PriceTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PriceTable {
        &self.table
    }

    /// Pure computation over an already-validated itemization.
    /// An empty itemization settles to zero.
    pub fn calculate(&self, items: &[ScrapItem]) -> Settlement {
        let mut amount = 0.0;
        let mut weight = 0.0;
        let mut impact = ImpactTotals::default();

        for item in items {
            let rates = self.table.rates_for(item.category);
            amount += item.weight_kg * rates.base_price;
            weight += item.weight_kg;
            impact.add(&ImpactTotals {
                co2_kg: item.weight_kg * rates.co2_kg,
                water_litres: item.weight_kg * rates.water_litres,
                landfill_kg: item.weight_kg * rates.landfill_kg,
            });
        }

        Settlement {
            total_amount: round2(amount),
            total_weight_kg: weight,
            impact,
        }
    }

    /// Validate, then calculate. Finite weights can still overflow the
    /// sums; such an itemization is rejected before anything is charged.
    pub fn settle(&self, items: &[ScrapItem]) -> DispatchResult<Settlement> {
        validate_itemization(items)?;
        let settlement = self.calculate(items);
        let totals = [
            settlement.total_amount,
            settlement.total_weight_kg,
            settlement.impact.co2_kg,
            settlement.impact.water_litres,
            settlement.impact.landfill_kg,
        ];
        if totals.iter().any(|v| !v.is_finite()) {
            return Err(DispatchError::invalid(
                "itemization totals overflow; weights are out of range",
            ));
        }
        Ok(settlement)
    }
}
