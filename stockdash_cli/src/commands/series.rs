//! The `series` subcommand: the cleaned series with both moving averages.

use anyhow::Result;
use clap::Args;
use stockdash_lib::{load_series, MarketDataProvider};

use super::{report, spinner, TargetArgs};
use crate::output::{
    print_json, print_series_csv, print_series_markdown, print_series_table, OutputFormat,
};

#[derive(Args)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Show only the most recent N records (0 shows all)
    #[arg(long, default_value = "20")]
    pub tail: usize,
}

pub async fn run<P: MarketDataProvider>(
    args: &SeriesArgs,
    provider: &P,
    format: &OutputFormat,
) -> Result<()> {
    let config = match args.target.to_config() {
        Ok(config) => config,
        Err(e) => {
            report(&e);
            return Ok(());
        }
    };

    let pb = spinner(&config)?;
    let result = load_series(provider, &config).await;
    pb.finish_and_clear();

    let series = match result {
        Ok(series) => series,
        Err(e) => {
            report(&e);
            return Ok(());
        }
    };

    let bars = series.tail(args.tail);
    eprintln!(
        "{} ({}): showing {} of {} records",
        config.symbol,
        config.lookback,
        bars.len(),
        series.len()
    );

    match format {
        OutputFormat::Table => print_series_table(bars),
        OutputFormat::Json => print_json(&bars),
        OutputFormat::Csv => print_series_csv(bars)?,
        OutputFormat::Markdown => print_series_markdown(bars),
    }

    Ok(())
}
