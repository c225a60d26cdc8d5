//! The `export` subcommand: writes the full derived series to a CSV file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use stockdash_lib::{load_series, MarketDataProvider};

use super::{report, spinner, TargetArgs};
use crate::output::write_series_csv;

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Destination CSV file (overwritten if it exists)
    #[arg(long)]
    pub out: PathBuf,
}

pub async fn run<P: MarketDataProvider>(args: &ExportArgs, provider: &P) -> Result<()> {
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

    let file = std::fs::File::create(&args.out)
        .with_context(|| format!("failed to create {}", args.out.display()))?;
    write_series_csv(file, series.bars())?;

    eprintln!(
        "Wrote {} records for {} to {}",
        series.len(),
        config.symbol,
        args.out.display()
    );
    Ok(())
}
