//! The `summary` subcommand: latest close, its change, and the company profile.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use stockdash_lib::{
    load_dashboard, CompanyProfile, Dashboard, LatestChange, LookbackPeriod, MarketDataProvider,
};

use super::{report, spinner, TargetArgs};
use crate::output::{
    print_json, print_summary_csv, print_summary_markdown, print_summary_table, OutputFormat,
};

#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

/// JSON shape of the summary. The series itself is left to `series`.
#[derive(Serialize)]
struct SummaryView<'a> {
    symbol: &'a str,
    lookback: LookbackPeriod,
    records: usize,
    latest: Option<&'a LatestChange>,
    profile: &'a CompanyProfile,
}

impl<'a> From<&'a Dashboard> for SummaryView<'a> {
    fn from(dash: &'a Dashboard) -> Self {
        Self {
            symbol: &dash.config.symbol,
            lookback: dash.config.lookback,
            records: dash.series.len(),
            latest: dash.latest.as_ref(),
            profile: &dash.profile,
        }
    }
}

pub async fn run<P: MarketDataProvider>(
    args: &SummaryArgs,
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
    let result = load_dashboard(provider, &config).await;
    pb.finish_and_clear();

    let dash = match result {
        Ok(dash) => dash,
        Err(e) => {
            report(&e);
            return Ok(());
        }
    };

    match format {
        OutputFormat::Table => print_summary_table(&dash),
        OutputFormat::Json => print_json(&SummaryView::from(&dash)),
        OutputFormat::Csv => print_summary_csv(&dash)?,
        OutputFormat::Markdown => print_summary_markdown(&dash),
    }

    Ok(())
}
