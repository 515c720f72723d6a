//! Settlement configuration: fallback rates and per-category overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{DispatchError, DispatchResult};
use crate::settlement::CategoryRates;
use crate::types::ScrapCategory;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// Unit price for a category missing from the price table.
    pub fallback_unit_price: f64,
    /// Impact coefficients for a category missing from the price table.
    pub fallback_impact: FallbackImpact,
    /// Per-category overrides keyed by wire name ("Plastic", "E-Waste", ...).
    pub rates: BTreeMap<String, CategoryRates>,
}

/// Impact coefficients per kilogram used when a category has no entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackImpact {
    pub co2_kg: f64,
    pub water_litres: f64,
    pub landfill_kg: f64,
}

impl Default for FallbackImpact {
    fn default() -> Self {
        // Same coefficients as the Other category.
        Self {
            co2_kg: 1.0,
            water_litres: 1.0,
            landfill_kg: 0.5,
        }
    }
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            fallback_unit_price: 10.0,
            fallback_impact: FallbackImpact::default(),
            rates: BTreeMap::new(),
        }
    }
}

impl SettlementConfig {
    /// The fallback as a full rate entry.
    pub fn fallback_rates(&self) -> CategoryRates {
        CategoryRates {
            base_price: self.fallback_unit_price,
            co2_kg: self.fallback_impact.co2_kg,
            water_litres: self.fallback_impact.water_litres,
            landfill_kg: self.fallback_impact.landfill_kg,
        }
    }

    /// Overrides with their keys parsed into categories.
    pub fn parsed_overrides(&self) -> DispatchResult<Vec<(ScrapCategory, CategoryRates)>> {
        self.rates
            .iter()
            .map(|(name, rates)| {
                let category = name
                    .parse::<ScrapCategory>()
                    .map_err(|_| DispatchError::Config(format!("unknown rate category {name:?}")))?;
                Ok((category, *rates))
            })
            .collect()
    }

    pub fn validate(&self) -> DispatchResult<()> {
        check_rates("fallback", &self.fallback_rates())?;
        for (category, rates) in self.parsed_overrides()? {
            check_rates(category.as_str(), &rates)?;
        }
        Ok(())
    }
}

fn check_rates(label: &str, rates: &CategoryRates) -> DispatchResult<()> {
    let values = [
        rates.base_price,
        rates.co2_kg,
        rates.water_litres,
        rates.landfill_kg,
    ];
    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(DispatchError::Config(format!(
            "settlement rates for {label} must be finite and non-negative"
        )));
    }
    Ok(())
}
