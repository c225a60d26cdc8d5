//! Assembles everything the chart view needs for one symbol and lookback.

use serde::Serialize;

use crate::config::DashboardConfig;
use crate::error::{DashboardError, SeriesError};
use crate::profile::CompanyProfile;
use crate::provider::MarketDataProvider;
use crate::series::{prepare, summarize_latest, DerivedSeries, LatestChange};

/// The prepared series, its latest change, and the company profile.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub config: DashboardConfig,
    pub series: DerivedSeries,
    /// `None` when the series has a single record.
    pub latest: Option<LatestChange>,
    pub profile: CompanyProfile,
}

/// Fetches history for `config` and runs it through [`prepare`].
pub async fn load_series<P: MarketDataProvider>(
    provider: &P,
    config: &DashboardConfig,
) -> Result<DerivedSeries, DashboardError> {
    let raw = provider
        .fetch_history(&config.symbol, config.lookback)
        .await?;
    let series = prepare(&raw)?;
    tracing::debug!(
        "Prepared {} of {} bars for {}",
        series.len(),
        raw.len(),
        config.symbol
    );
    Ok(series)
}

/// Builds the full dashboard. Only history retrieval and cleaning can fail;
/// a missing metric or profile degrades the view instead.
pub async fn load_dashboard<P: MarketDataProvider>(
    provider: &P,
    config: &DashboardConfig,
) -> Result<Dashboard, DashboardError> {
    let series = load_series(provider, config).await?;

    let latest = match summarize_latest(&series) {
        Ok(change) => Some(change),
        Err(SeriesError::InsufficientHistory { available }) => {
            tracing::info!(
                "Only {} record(s) for {}; omitting latest change",
                available,
                config.symbol
            );
            None
        }
        Err(e) => return Err(e.into()),
    };

    let profile = match provider.fetch_profile(&config.symbol).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Failed to load profile for {}: {}", config.symbol, e);
            CompanyProfile::default()
        }
    };

    Ok(Dashboard {
        config: config.clone(),
        series,
        latest,
        profile,
    })
}
