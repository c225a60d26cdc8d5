//! Error types for the library layer.

use thiserror::Error;

/// Failures of the price series processor itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    /// Cleaning removed every record.
    #[error("No usable price data after removing incomplete records")]
    EmptySeries,
    /// A change needs two records to compare.
    #[error("Need at least 2 records to compute a change, found {available}")]
    InsufficientHistory { available: usize },
    /// The previous close is zero, so the percentage change has no value.
    #[error("Previous close is zero; percentage change is undefined")]
    DivisionByZero,
}

/// Errors from fetching data out of a market data provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Unknown symbol '{0}'")]
    UnknownSymbol(String),
    #[error("Rate limited by the market data provider")]
    RateLimited,
    /// Yahoo refused the session cookie or crumb.
    #[error("Yahoo Finance refused the request: {0}")]
    Unauthorized(String),
    #[error("No price data returned for '{0}'")]
    NoData(String),
    /// The provider answered, but with an error payload.
    #[error("Provider returned an error: {0}")]
    Upstream(String),
    #[error("Market data request failed: {0}")]
    Api(#[source] stockdash_api::Error),
}

/// Everything that can stop a dashboard request. Converted to a
/// user-facing message at the presentation boundary, never fatal.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Series(#[from] SeriesError),
    /// User-provided input failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DashboardError {
    /// The message shown to the user in place of the chart.
    ///
    /// An empty series reads the same as a provider that returned nothing.
    pub fn user_message(&self) -> String {
        match self {
            Self::Series(SeriesError::EmptySeries) => "No data found.".to_string(),
            Self::Provider(ProviderError::NoData(symbol)) => {
                format!("No data found for '{}'.", symbol)
            }
            Self::Provider(e) => format!("Failed to load market data: {}", e),
            Self::Series(e) => e.to_string(),
            Self::InvalidInput(msg) => format!("Invalid input: {}", msg),
        }
    }
}
