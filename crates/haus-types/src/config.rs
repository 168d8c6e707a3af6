//! Engine configuration and the rent schedule.

use serde::{Deserialize, Serialize};

use crate::{constants, Address, HausError, Result};

/// Rent schedule for program-owned records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rent {
    pub lamports_per_byte_year: u64,
    /// Years of rent a record must hold up front.
    pub exemption_threshold: u64,
}

impl Default for Rent {
    fn default() -> Self {
        Self {
            lamports_per_byte_year: constants::DEFAULT_LAMPORTS_PER_BYTE_YEAR,
            exemption_threshold: constants::DEFAULT_EXEMPTION_THRESHOLD,
        }
    }
}

impl Rent {
    /// Lamports an account with `data_len` bytes must retain to stay alive.
    #[must_use]
    pub fn minimum_balance(&self, data_len: usize) -> u64 {
        let bytes = constants::ACCOUNT_STORAGE_OVERHEAD.saturating_add(data_len as u64);
        bytes
            .saturating_mul(self.lamports_per_byte_year)
            .saturating_mul(self.exemption_threshold)
    }
}

/// Configuration for one engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Namespace under which every record address is derived.
    pub program_id: Address,
    pub rent: Rent,
    /// Number of committed transaction ids remembered for replay rejection.
    /// Nonces of evicted ids become a floor below which nothing is accepted.
    pub replay_cache_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program_id: constants::DEFAULT_PROGRAM_ID,
            rent: Rent::default(),
            replay_cache_size: constants::DEFAULT_REPLAY_CACHE_SIZE,
        }
    }
}

impl EngineConfig {
    /// Parse from JSON text; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.replay_cache_size == 0 {
            return Err(HausError::Configuration(
                "replay_cache_size must be > 0".into(),
            ));
        }
        if self.rent.lamports_per_byte_year == 0 || self.rent.exemption_threshold == 0 {
            return Err(HausError::Configuration(
                "rent rate and exemption threshold must be > 0".into(),
            ));
        }
        if self.program_id == Address::ZERO {
            return Err(HausError::Configuration("program_id must be set".into()));
        }
        Ok(())
    }
}
