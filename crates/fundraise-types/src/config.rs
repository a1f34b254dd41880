//! Ledger configuration.

use serde::{Deserialize, Serialize};

use crate::{FundraiseError, Result, constants};

/// Limits applied when campaigns are created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Maximum title length in bytes.
    pub max_title_len: usize,
    /// Maximum description length in bytes.
    pub max_description_len: usize,
    /// Longest allowed campaign duration, in seconds.
    pub max_campaign_duration_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_title_len: constants::DEFAULT_MAX_TITLE_LEN,
            max_description_len: constants::DEFAULT_MAX_DESCRIPTION_LEN,
            max_campaign_duration_secs: constants::DEFAULT_MAX_CAMPAIGN_DURATION_SECS,
        }
    }
}

impl LedgerConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| FundraiseError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject limits that would make every campaign invalid.
    pub fn validate(&self) -> Result<()> {
        if self.max_title_len == 0 {
            return Err(FundraiseError::Configuration(
                "max_title_len must be > 0".into(),
            ));
        }
        if self.max_campaign_duration_secs == 0 {
            return Err(FundraiseError::Configuration(
                "max_campaign_duration_secs must be > 0".into(),
            ));
        }
        if i64::try_from(self.max_campaign_duration_secs).is_err() {
            return Err(FundraiseError::Configuration(
                "max_campaign_duration_secs out of range".into(),
            ));
        }
        Ok(())
    }
}
