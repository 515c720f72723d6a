//! Matching subsystem configuration.

use serde::{Deserialize, Serialize};

use crate::errors::{DispatchError, DispatchResult};

/// Default search radius around the pickup origin.
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Collectors farther than this from the request origin are excluded.
    pub radius_km: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

impl MatchingConfig {
    pub fn validate(&self) -> DispatchResult<()> {
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(DispatchError::Config(format!(
                "matching.radius_km must be positive, got {}",
                self.radius_km
            )));
        }
        Ok(())
    }
}
