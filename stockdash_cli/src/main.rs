mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stockdash_lib::YahooProvider;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "stockdash")]
#[command(about = "Daily price history with 20/50-day moving averages from Yahoo Finance")]
struct Cli {
    /// Output format: table, json, csv, markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cleaned price series with SMA 20 / SMA 50
    Series(commands::series::SeriesArgs),
    /// Show the latest close, its change, and the company profile
    Summary(commands::summary::SummaryArgs),
    /// Write the full derived series to a CSV file
    Export(commands::export::ExportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stockdash=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let provider = YahooProvider::from_env();

    match &cli.command {
        Commands::Series(args) => commands::series::run(args, &provider, &format).await?,
        Commands::Summary(args) => commands::summary::run(args, &provider, &format).await?,
        Commands::Export(args) => commands::export::run(args, &provider).await?,
    }

    Ok(())
}
