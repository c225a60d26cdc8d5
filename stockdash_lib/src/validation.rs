use std::str::FromStr;

use crate::config::LookbackPeriod;
use crate::error::DashboardError;

pub const MAX_SYMBOL_LENGTH: usize = 16;

/// Validate a ticker symbol: trim, uppercase, enforce length and charset.
///
/// Accepts ASCII letters and digits plus `.` (class shares and exchange
/// suffixes such as `7203.T`), `-` (`BRK-B`), `^` (indices such as `^GSPC`)
/// and `=` (currencies and futures such as `EURUSD=X`).
pub fn validate_symbol(input: &str) -> Result<String, DashboardError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::InvalidInput("symbol is empty".to_string()));
    }
    if trimmed.len() > MAX_SYMBOL_LENGTH {
        return Err(DashboardError::InvalidInput(format!(
            "symbol exceeds maximum length of {} bytes",
            MAX_SYMBOL_LENGTH
        )));
    }
    if let Some(bad) = trimmed
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')))
    {
        return Err(DashboardError::InvalidInput(format!(
            "symbol '{}' contains invalid character '{}'",
            trimmed,
            bad.escape_default()
        )));
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// Validate a lookback string such as `5y`, `6mo` or `max`, case-insensitive.
pub fn validate_lookback(input: &str) -> Result<LookbackPeriod, DashboardError> {
    LookbackPeriod::from_str(input.trim()).map_err(|_| {
        let valid = LookbackPeriod::ALL
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        DashboardError::InvalidInput(format!(
            "unknown lookback period '{}'. Valid values: {}",
            input, valid
        ))
    })
}
