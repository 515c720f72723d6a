use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DispatchError;

/// Closed set of scrap categories a collector can service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScrapCategory {
    Plastic,
    Metal,
    Paper,
    #[serde(rename = "E-Waste")]
    EWaste,
    Glass,
    Other,
}

impl ScrapCategory {
    pub const ALL: [ScrapCategory; 6] = [
        Self::Plastic,
        Self::Metal,
        Self::Paper,
        Self::EWaste,
        Self::Glass,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plastic => "Plastic",
            Self::Metal => "Metal",
            Self::Paper => "Paper",
            Self::EWaste => "E-Waste",
            Self::Glass => "Glass",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ScrapCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScrapCategory {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| DispatchError::invalid(format!("unknown scrap category: {s:?}")))
    }
}

/// One measured line of a completed pickup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrapItem {
    pub category: ScrapCategory,
    pub weight_kg: f64,
}

impl ScrapItem {
    pub fn new(category: ScrapCategory, weight_kg: f64) -> Self {
        Self {
            category,
            weight_kg,
        }
    }
}
