use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use stockdash_lib::{CompanyProfile, Dashboard, DerivedBar, LatestChange};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Placeholder for a value the provider did not supply.
const MISSING: &str = "-";
/// Placeholder for a percentage that has no numeric value.
const UNDEFINED_PERCENT: &str = "n/a";

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct SeriesRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Open")]
    #[serde(rename = "Open")]
    open: String,
    #[tabled(rename = "High")]
    #[serde(rename = "High")]
    high: String,
    #[tabled(rename = "Low")]
    #[serde(rename = "Low")]
    low: String,
    #[tabled(rename = "Close")]
    #[serde(rename = "Close")]
    close: String,
    #[tabled(rename = "Volume")]
    #[serde(rename = "Volume")]
    volume: u64,
    #[tabled(rename = "SMA 20")]
    #[serde(rename = "SMA 20")]
    sma20: String,
    #[tabled(rename = "SMA 50")]
    #[serde(rename = "SMA 50")]
    sma50: String,
}

#[derive(Tabled, Serialize)]
struct SummaryRow {
    #[tabled(rename = "Field")]
    #[serde(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
}

// -- Row builders --

fn build_series_rows(bars: &[DerivedBar]) -> Vec<SeriesRow> {
    bars.iter()
        .map(|b| SeriesRow {
            date: b.date.to_string(),
            open: format!("{:.2}", b.open),
            high: format!("{:.2}", b.high),
            low: format!("{:.2}", b.low),
            close: format!("{:.2}", b.close),
            volume: b.volume,
            sma20: format_optional(b.sma20),
            sma50: format_optional(b.sma50),
        })
        .collect()
}

fn build_summary_rows(dash: &Dashboard) -> Vec<SummaryRow> {
    let profile: &CompanyProfile = &dash.profile;
    let latest = dash.latest.as_ref();

    vec![
        SummaryRow {
            field: "Symbol",
            value: dash.config.symbol.clone(),
        },
        SummaryRow {
            field: "Name",
            value: or_missing(profile.name.as_deref()),
        },
        SummaryRow {
            field: "Sector",
            value: or_missing(profile.sector.as_deref()),
        },
        SummaryRow {
            field: "As of",
            value: latest
                .map(|l| l.last_date.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
        },
        SummaryRow {
            field: "Close",
            value: latest
                .map(|l| format_price(l.last_close))
                .unwrap_or_else(|| MISSING.to_string()),
        },
        SummaryRow {
            field: "Change",
            value: latest
                .map(format_change)
                .unwrap_or_else(|| MISSING.to_string()),
        },
        SummaryRow {
            field: "P/E (TTM)",
            value: format_optional(profile.trailing_pe),
        },
        SummaryRow {
            field: "P/B",
            value: format_optional(profile.price_to_book),
        },
        SummaryRow {
            field: "Dividend Yield",
            value: format_yield(profile.dividend_yield),
        },
        SummaryRow {
            field: "Market Cap",
            value: format_market_cap(profile.market_cap),
        },
    ]
}

// -- Table output --

pub fn print_series_table(bars: &[DerivedBar]) {
    println!("{}", Table::new(build_series_rows(bars)));
}

pub fn print_summary_table(dash: &Dashboard) {
    println!("{}", Table::new(build_summary_rows(dash)));
}

// -- Markdown output --

pub fn print_series_markdown(bars: &[DerivedBar]) {
    let mut table = Table::new(build_series_rows(bars));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_summary_markdown(dash: &Dashboard) {
    let mut table = Table::new(build_summary_rows(dash));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_series_csv(bars: &[DerivedBar]) -> Result<()> {
    write_rows(std::io::stdout(), &build_series_rows(bars))
}

pub fn print_summary_csv(dash: &Dashboard) -> Result<()> {
    write_rows(std::io::stdout(), &build_summary_rows(dash))
}

/// Writes the series with raw numeric columns. Undefined moving averages are
/// left as empty cells.
pub fn write_series_csv<W: Write>(writer: W, bars: &[DerivedBar]) -> Result<()> {
    write_rows(writer, bars)
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

// -- Formatting --

fn or_missing(value: Option<&str>) -> String {
    value.unwrap_or(MISSING).to_string()
}

fn format_optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => MISSING.to_string(),
    }
}

fn format_price(value: f64) -> String {
    format!("${:.2}", value)
}

/// `delta (pct%)`, with `n/a` in place of an undefined percentage.
fn format_change(change: &LatestChange) -> String {
    match change.percent_change() {
        Ok(pct) => format!("{:+.2} ({:+.2}%)", change.delta, pct),
        Err(_) => format!("{:+.2} ({})", change.delta, UNDEFINED_PERCENT),
    }
}

/// Dividend yield arrives as a fraction.
fn format_yield(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => MISSING.to_string(),
    }
}

fn format_market_cap(value: Option<u64>) -> String {
    let Some(value) = value else {
        return MISSING.to_string();
    };
    let v = value as f64;
    if value >= 1_000_000_000_000 {
        format!("${:.2}T", v / 1_000_000_000_000.0)
    } else if value >= 1_000_000_000 {
        format!("${:.2}B", v / 1_000_000_000.0)
    } else if value >= 1_000_000 {
        format!("${:.1}M", v / 1_000_000.0)
    } else {
        format!("${}", value)
    }
}
