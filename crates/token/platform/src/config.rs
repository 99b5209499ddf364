//! Platform configuration

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PlatformError;

/// Host platform configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Where epochs come from
    pub epoch_clock: EpochClockConfig,

    /// How object ids are allocated
    pub id_allocation: IdAllocation,
}

/// Epoch source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EpochClockConfig {
    /// Epochs only move when advanced explicitly
    Manual { genesis_epoch: u64 },
    /// Epochs advance every `epoch_length_secs` since `genesis`
    WallClock {
        genesis: DateTime<Utc>,
        epoch_length_secs: u64,
    },
}

impl Default for EpochClockConfig {
    fn default() -> Self {
        Self::Manual { genesis_epoch: 0 }
    }
}

/// Object id allocation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdAllocation {
    #[default]
    Random,
    Sequential {
        start: u64,
    },
}

impl PlatformConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlatformError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, PlatformError> {
        let config: PlatformConfig =
            toml::from_str(contents).map_err(|e| PlatformError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PlatformError> {
        if let EpochClockConfig::WallClock {
            epoch_length_secs, ..
        } = self.epoch_clock
        {
            if epoch_length_secs == 0 {
                return Err(PlatformError::Config(
                    "epoch_length_secs must be positive".into(),
                ));
            }
        }
        Ok(())
    }
}
