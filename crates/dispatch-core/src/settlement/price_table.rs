//! Static price/impact table, built once and read-only afterwards.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::SettlementConfig;
use crate::errors::DispatchResult;
use crate::types::ScrapCategory;

/// Per-kilogram price and impact coefficients for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryRates {
    /// Currency per kilogram.
    pub base_price: f64,
    /// CO₂ saved, kilograms per kilogram.
    pub co2_kg: f64,
    /// Water conserved, litres per kilogram.
    pub water_litres: f64,
    /// Landfill diverted, kilograms per kilogram.
    pub landfill_kg: f64,
}

impl CategoryRates {
    pub const fn new(base_price: f64, co2_kg: f64, water_litres: f64, landfill_kg: f64) -> Self {
        Self {
            base_price,
            co2_kg,
            water_litres,
            landfill_kg,
        }
    }
}

/// Built-in rates: price, CO₂, water, landfill.
const STANDARD_RATES: [(ScrapCategory, CategoryRates); 6] = [
    (ScrapCategory::Plastic, CategoryRates::new(20.0, 2.0, 10.0, 1.5)),
    (ScrapCategory::Metal, CategoryRates::new(40.0, 5.0, 2.0, 0.5)),
    (ScrapCategory::Paper, CategoryRates::new(10.0, 1.0, 5.0, 1.0)),
    (ScrapCategory::EWaste, CategoryRates::new(50.0, 10.0, 1.0, 2.0)),
    (ScrapCategory::Glass, CategoryRates::new(15.0, 0.5, 1.0, 0.2)),
    (ScrapCategory::Other, CategoryRates::new(10.0, 1.0, 1.0, 0.5)),
];

#[derive(Debug, Clone)]
pub struct PriceTable {
    rates: FxHashMap<ScrapCategory, CategoryRates>,
    fallback: CategoryRates,
}

impl PriceTable {
    /// An explicit table. Categories left out resolve to `fallback`.
    pub fn with_rates(
        rates: impl IntoIterator<Item = (ScrapCategory, CategoryRates)>,
        fallback: CategoryRates,
    ) -> Self {
        Self {
            rates: rates.into_iter().collect(),
            fallback,
        }
    }

    /// Built-in rates with the default fallback.
    pub fn standard() -> Self {
        Self::with_rates(STANDARD_RATES, SettlementConfig::default().fallback_rates())
    }

    /// Built-in rates with the configured overrides and fallback applied.
    pub fn from_config(config: &SettlementConfig) -> DispatchResult<Self> {
        config.validate()?;
        let mut table = Self::with_rates(STANDARD_RATES, config.fallback_rates());
        table.rates.extend(config.parsed_overrides()?);
        Ok(table)
    }

    /// Rates for `category`, or the fallback when the table has no entry.
    pub fn rates_for(&self, category: ScrapCategory) -> &CategoryRates {
        self.rates.get(&category).unwrap_or(&self.fallback)
    }

    pub fn has_entry(&self, category: ScrapCategory) -> bool {
        self.rates.contains_key(&category)
    }

    pub fn fallback(&self) -> &CategoryRates {
        &self.fallback
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::standard()
    }
}
