use std::path::Path;

use serde::{Deserialize, Serialize};
use sts_core::error::{StsError, StsResult};
use sts_core::types::{Amount, BlockHeight};

/// Parameters for opening a funding round without spelling out every value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrowdfundConfig {
    pub start_height: BlockHeight,
    pub end_height: BlockHeight,
    /// Units advertised for the round.
    pub allotment: Amount,
    /// Whole tokens minted per contributed unit; scaled by the project's
    /// decimals to get the stage rate.
    pub tokens_per_unit: Amount,
}

impl Default for CrowdfundConfig {
    fn default() -> Self {
        Self {
            start_height: 123,
            end_height: 123_123,
            allotment: 1_110,
            tokens_per_unit: 10,
        }
    }
}

impl CrowdfundConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> StsResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| StsError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn from_json_str(json: &str) -> StsResult<Self> {
        serde_json::from_str(json).map_err(|e| StsError::Config(e.to_string()))
    }

    /// Stage rate for a token with `decimals` places: `tokens_per_unit * 10^decimals`.
    pub fn rate_for(&self, decimals: u8) -> StsResult<Amount> {
        10u128
            .checked_pow(decimals as u32)
            .and_then(|scale| self.tokens_per_unit.checked_mul(scale))
            .filter(|rate| *rate > 0)
            .ok_or(StsError::InvalidRate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_bootstrap_round() {
        let cfg = CrowdfundConfig::default();
        assert_eq!(cfg.start_height, 123);
        assert_eq!(cfg.end_height, 123_123);
        assert_eq!(cfg.allotment, 1_110);
        assert_eq!(cfg.rate_for(8).unwrap(), 1_000_000_000);
    }

    #[test]
    fn zero_tokens_per_unit_is_invalid_rate() {
        let cfg = CrowdfundConfig { tokens_per_unit: 0, ..Default::default() };
        assert_eq!(cfg.rate_for(2), Err(StsError::InvalidRate));
    }

    #[test]
    fn json_overrides_selected_fields() {
        let cfg = CrowdfundConfig::from_json_str(r#"{ "start_height": 5, "end_height": 9 }"#).unwrap();
        assert_eq!((cfg.start_height, cfg.end_height), (5, 9));
        assert_eq!(cfg.tokens_per_unit, 10);
    }
}
