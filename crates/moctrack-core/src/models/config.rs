//! Configuration structures for the engine and its reports.

use serde::{Deserialize, Serialize};

use crate::derivation::Rates;
use crate::error::{MocError, Result};
use crate::rollup::{UnitMode, VatMode};

/// Main configuration for moctrack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MocConfig {
    /// VAT and retention rates.
    pub rates: Rates,

    /// Reporting defaults.
    pub reporting: ReportingConfig,
}

/// Defaults for dashboard-style reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Project type label meaning "no filter".
    pub overall_label: String,

    /// Basis for headline values.
    pub vat_mode: VatMode,

    /// Display units for headline values.
    pub unit_mode: UnitMode,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            overall_label: "Overall".to_string(),
            vat_mode: VatMode::Inclusive,
            unit_mode: UnitMode::Full,
        }
    }
}

impl MocConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject rates a caller could never have meant.
    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [
            ("vat_rate", self.rates.vat_rate),
            ("retention_rate", self.rates.retention_rate),
        ] {
            if rate.is_sign_negative() && !rate.is_zero() {
                return Err(MocError::Config(format!("{} must not be negative", name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: MocConfig =
            serde_json::from_str(r#"{ "rates": { "vat_rate": "0.05" } }"#).unwrap();

        assert_eq!(config.rates.vat_rate, Decimal::new(5, 2));
        assert_eq!(config.rates.retention_rate, Decimal::new(10, 2));
        assert_eq!(config.reporting.overall_label, "Overall");
    }

    #[test]
    fn test_negative_rate_rejected() {
        let mut config = MocConfig::default();
        config.rates.retention_rate = Decimal::new(-1, 2);

        assert!(matches!(config.validate(), Err(MocError::Config(_))));
    }
}
