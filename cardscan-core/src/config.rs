//! Scan configuration shared by every page of a run.

use serde::{Deserialize, Serialize};

use crate::currency::DEFAULT_HOME_CURRENCY;
use crate::error::{Result, ScanError};

/// Rows are split when consecutive fragments differ vertically by more than
/// this fraction of the mean fragment height. Empirical; tune against the
/// engine's layout noise.
pub const DEFAULT_ROW_THRESHOLD_FACTOR: f64 = 0.6;

pub const DEFAULT_TIMEZONE: &str = "Asia/Hong_Kong";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    /// Billing currency assigned to every parsed transaction
    pub home_currency: String,
    /// IANA zone used for "today" when no statement date is known
    pub timezone: String,
    pub row_threshold_factor: f64,
    /// Script/language hints passed to the OCR engine
    pub languages: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            home_currency: DEFAULT_HOME_CURRENCY.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            row_threshold_factor: DEFAULT_ROW_THRESHOLD_FACTOR,
            languages: vec!["en-US".to_string(), "zh-Hant".to_string()],
        }
    }
}

impl ScanConfig {
    pub fn from_toml(s: &str) -> Result<Self> {
        let cfg: ScanConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.row_threshold_factor.is_finite() && self.row_threshold_factor > 0.0) {
            return Err(ScanError::Config(format!(
                "row_threshold_factor must be positive, got {}",
                self.row_threshold_factor
            )));
        }
        if self.home_currency.trim().len() != 3 {
            return Err(ScanError::Config(format!(
                "home_currency must be a 3-letter code, got {:?}",
                self.home_currency
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = ScanConfig::from_toml("home_currency = \"USD\"\n").unwrap();
        assert_eq!(cfg.home_currency, "USD");
        assert_eq!(cfg.row_threshold_factor, DEFAULT_ROW_THRESHOLD_FACTOR);
        assert_eq!(cfg.timezone, DEFAULT_TIMEZONE);
    }

    #[test]
    fn test_rejects_bad_factor() {
        assert!(ScanConfig::from_toml("row_threshold_factor = 0.0\n").is_err());
        assert!(ScanConfig::from_toml("home_currency = \"DOLLARS\"\n").is_err());
    }
}
