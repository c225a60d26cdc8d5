//! Per-request dashboard configuration and process-level settings.

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::validation;

/// How much history to request. Rendered as the provider's `range` parameter.
pub use stockdash_api::Range as LookbackPeriod;

pub const DEFAULT_SYMBOL: &str = "AAPL";

/// Environment variable that overrides the provider base URL.
pub const BASE_URL_ENV: &str = "STOCKDASH_BASE_URL";

/// The symbol and lookback window for one dashboard request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub symbol: String,
    pub lookback: LookbackPeriod,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            lookback: LookbackPeriod::default(),
        }
    }
}

impl DashboardConfig {
    /// Builds a config after normalizing and validating the symbol.
    pub fn new(symbol: &str, lookback: LookbackPeriod) -> Result<Self, DashboardError> {
        Ok(Self {
            symbol: validation::validate_symbol(symbol)?,
            lookback,
        })
    }

    /// Builds a config from raw user strings.
    pub fn parse(symbol: &str, lookback: &str) -> Result<Self, DashboardError> {
        Self::new(symbol, validation::validate_lookback(lookback)?)
    }
}

/// Provider base URL from the environment, if set to something non-empty.
pub fn base_url_from_env() -> Option<String> {
    std::env::var(BASE_URL_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_aapl_five_years() {
        let config = DashboardConfig::default();
        assert_eq!(config.symbol, "AAPL");
        assert_eq!(config.lookback, LookbackPeriod::FiveYears);
    }

    #[test]
    fn new_normalizes_symbol() {
        let config = DashboardConfig::new(" nvda ", LookbackPeriod::OneYear).unwrap();
        assert_eq!(config.symbol, "NVDA");
    }

    #[test]
    fn parse_rejects_bad_lookback() {
        let err = DashboardConfig::parse("AAPL", "forever").unwrap_err();
        assert!(matches!(err, DashboardError::InvalidInput(_)));
    }

    #[test]
    fn parse_rejects_bad_symbol() {
        assert!(DashboardConfig::parse("", "5y").is_err());
    }

    #[test]
    fn config_serializes_lookback_as_wire_value() {
        let config = DashboardConfig::parse("aapl", "ytd").unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["symbol"], "AAPL");
        assert_eq!(json["lookback"], "ytd");
    }
}
