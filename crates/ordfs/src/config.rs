use ordfs_funding::FundingParams;
use serde::{Deserialize, Serialize};

use crate::errors::{OrdfsError, OrdfsResult};

/// Upload configuration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdfsConfig {
    /// Fee and change handling.
    pub funding: FundingParams,

    /// Value of each inscription output, sats.
    pub inscription_value: u64,
}

impl Default for OrdfsConfig {
    fn default() -> Self {
        Self {
            funding: FundingParams::default(),
            inscription_value: 1,
        }
    }
}

impl OrdfsConfig {
    /// Parses TOML text; any missing field takes its default.
    pub fn from_toml_str(s: &str) -> OrdfsResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.funding.validate().map_err(OrdfsError::Funding)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use ordfs_funding::FundingError;

    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = OrdfsConfig::from_toml_str("").unwrap();
        assert_eq!(config, OrdfsConfig::default());
        assert_eq!(config.inscription_value, 1);
        assert_eq!(config.funding.fee_rate_per_kb, 50);
    }

    #[test]
    fn test_partial_toml() {
        let config = OrdfsConfig::from_toml_str(
            r#"
            inscription_value = 546

            [funding]
            fee_rate_per_kb = 1
            split_amount = 20000
            "#,
        )
        .unwrap();

        assert_eq!(config.inscription_value, 546);
        assert_eq!(config.funding.fee_rate_per_kb, 1);
        assert_eq!(config.funding.split_amount, 20_000);
        assert_eq!(config.funding.input_size, 148);
        assert_eq!(config.funding.max_change_outputs, 100);
    }

    #[test]
    fn test_invalid_params() {
        let err = OrdfsConfig::from_toml_str("[funding]\nmax_change_outputs = 0\n").unwrap_err();
        assert!(matches!(
            err,
            OrdfsError::Funding(FundingError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_bad_toml() {
        let err = OrdfsConfig::from_toml_str("inscription_value = \"one\"").unwrap_err();
        assert!(matches!(err, OrdfsError::Config(_)));
    }
}
