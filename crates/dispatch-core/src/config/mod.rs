pub mod logging_config;
pub mod matching_config;
pub mod settlement_config;
pub mod storage_config;

use serde::{Deserialize, Serialize};

pub use logging_config::LoggingConfig;
pub use matching_config::MatchingConfig;
pub use settlement_config::SettlementConfig;
pub use storage_config::StorageConfig;

use crate::errors::{DispatchError, DispatchResult};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DispatchConfig {
    pub matching: MatchingConfig,
    pub settlement: SettlementConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl DispatchConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> DispatchResult<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| DispatchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make matching or settlement meaningless.
    pub fn validate(&self) -> DispatchResult<()> {
        self.matching.validate()?;
        self.settlement.validate()?;
        Ok(())
    }
}
