//! CLI subcommand implementations.

pub mod export;
pub mod series;
pub mod summary;

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use stockdash_lib::config::DEFAULT_SYMBOL;
use stockdash_lib::{DashboardConfig, DashboardError};

/// Symbol and lookback shared by every subcommand.
#[derive(Args)]
pub struct TargetArgs {
    /// Ticker symbol (e.g. AAPL, 7203.T, BRK-B, ^GSPC)
    #[arg(long, default_value = DEFAULT_SYMBOL)]
    pub symbol: String,

    /// History to load: 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max
    #[arg(long, default_value = "5y")]
    pub lookback: String,
}

impl TargetArgs {
    pub fn to_config(&self) -> Result<DashboardConfig, DashboardError> {
        DashboardConfig::parse(&self.symbol, &self.lookback)
    }
}

/// Prints the user-facing message for a failed request. The command still
/// exits successfully.
pub(crate) fn report(err: &DashboardError) {
    tracing::debug!("Request failed: {:?}", err);
    eprintln!("Error: {}", err.user_message());
}

/// Spinner on stderr while a provider request is in flight.
pub(crate) fn spinner(config: &DashboardConfig) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    pb.set_message(format!(
        "fetching {} ({}) from Yahoo Finance...",
        config.symbol, config.lookback
    ));
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
