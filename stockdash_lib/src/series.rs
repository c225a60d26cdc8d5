//! Price series preparation: cleaning, simple moving averages, and the
//! latest-change summary that feed the chart.
//!
//! Everything here is a pure, synchronous transform over an in-memory
//! series. Network retrieval happens before, in [`crate::provider`].

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

/// Trailing window of the short moving average.
pub const SHORT_WINDOW: usize = 20;
/// Trailing window of the long moving average.
pub const LONG_WINDOW: usize = 50;

/// One trading period as delivered by the provider. Any field may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    /// Bar time in the exchange's UTC offset.
    pub timestamp: DateTime<FixedOffset>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

/// Raw bars in ascending timestamp order, one per trading day.
pub type RawSeries = Vec<RawBar>;

impl RawBar {
    /// Normalizes the bar, or `None` if any field is missing or non-finite.
    fn to_clean(&self) -> Option<CleanBar> {
        Some(CleanBar {
            date: self.timestamp.date_naive(),
            open: present(self.open)?,
            high: present(self.high)?,
            low: present(self.low)?,
            close: present(self.close)?,
            volume: self.volume?,
        })
    }
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// A complete bar keyed by its exchange-local calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CleanBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// A bar with both moving averages attached. `None` means the trailing
/// window is not yet full at this position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
}

/// Anything with a date and a closing price.
pub trait PriceBar {
    fn date(&self) -> NaiveDate;
    fn close(&self) -> f64;
}

impl PriceBar for CleanBar {
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn close(&self) -> f64 {
        self.close
    }
}

impl PriceBar for DerivedBar {
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn close(&self) -> f64 {
        self.close
    }
}

/// A date-ordered sequence of bars with unique dates.
pub trait PriceSeries {
    type Bar: PriceBar;
    fn bars(&self) -> &[Self::Bar];
}

/// Bars with every field present, strictly ascending by date, no duplicates.
/// May be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanSeries {
    bars: Vec<CleanBar>,
}

impl CleanSeries {
    pub fn bars(&self) -> &[CleanBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Re-expresses the series as raw bars stamped at midnight UTC.
    pub fn to_raw(&self) -> RawSeries {
        self.bars
            .iter()
            .map(|b| raw_from_parts(b.date, b.open, b.high, b.low, b.close, b.volume))
            .collect()
    }
}

impl PriceSeries for CleanSeries {
    type Bar = CleanBar;
    fn bars(&self) -> &[CleanBar] {
        &self.bars
    }
}

/// A cleaned, non-empty series with `sma20`/`sma50` attached to every bar.
///
/// Deserialization reads the bars as a [`CleanSeries`] and runs them through
/// [`prepare`] again, so incoming averages are discarded and recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CleanSeries")]
pub struct DerivedSeries {
    bars: Vec<DerivedBar>,
}

impl DerivedSeries {
    /// Attaches moving averages to a cleaned series.
    pub fn from_clean(clean: &CleanSeries) -> Result<Self, SeriesError> {
        if clean.is_empty() {
            return Err(SeriesError::EmptySeries);
        }
        let closes: Vec<f64> = clean.bars.iter().map(|b| b.close).collect();
        let short = simple_moving_average(&closes, SHORT_WINDOW);
        let long = simple_moving_average(&closes, LONG_WINDOW);

        let bars = clean
            .bars
            .iter()
            .zip(short)
            .zip(long)
            .map(|((b, sma20), sma50)| DerivedBar {
                date: b.date,
                open: b.open,
                high: b.high,
                low: b.low,
                close: b.close,
                volume: b.volume,
                sma20,
                sma50,
            })
            .collect();
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[DerivedBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Never true for a series built by [`prepare`].
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The most recent bar.
    pub fn last(&self) -> Option<&DerivedBar> {
        self.bars.last()
    }

    /// The last `n` bars, or all of them when `n` is zero or exceeds the length.
    pub fn tail(&self, n: usize) -> &[DerivedBar] {
        if n == 0 || n >= self.bars.len() {
            &self.bars
        } else {
            &self.bars[self.bars.len() - n..]
        }
    }

    /// Drops the moving averages.
    pub fn to_clean(&self) -> CleanSeries {
        CleanSeries {
            bars: self
                .bars
                .iter()
                .map(|b| CleanBar {
                    date: b.date,
                    open: b.open,
                    high: b.high,
                    low: b.low,
                    close: b.close,
                    volume: b.volume,
                })
                .collect(),
        }
    }

    /// Re-expresses the series as raw bars stamped at midnight UTC.
    pub fn to_raw(&self) -> RawSeries {
        self.bars
            .iter()
            .map(|b| raw_from_parts(b.date, b.open, b.high, b.low, b.close, b.volume))
            .collect()
    }

    pub fn latest_change(&self) -> Result<LatestChange, SeriesError> {
        summarize_latest(self)
    }
}

impl TryFrom<CleanSeries> for DerivedSeries {
    type Error = SeriesError;

    fn try_from(series: CleanSeries) -> Result<Self, Self::Error> {
        prepare(&series.to_raw())
    }
}

impl PriceSeries for DerivedSeries {
    type Bar = DerivedBar;
    fn bars(&self) -> &[DerivedBar] {
        &self.bars
    }
}

fn raw_from_parts(
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
) -> RawBar {
    RawBar {
        timestamp: date.and_time(NaiveTime::MIN).and_utc().fixed_offset(),
        open: Some(open),
        high: Some(high),
        low: Some(low),
        close: Some(close),
        volume: Some(volume),
    }
}

/// Removes incomplete records and normalizes timestamps to calendar dates.
///
/// A record is dropped when any price is missing or non-finite, or its
/// volume is missing. Records sharing a date collapse to the one that
/// appears last in the input. The result is ordered by date.
pub fn clean(raw: &[RawBar]) -> CleanSeries {
    let mut by_date: BTreeMap<NaiveDate, CleanBar> = BTreeMap::new();
    let mut incomplete = 0usize;
    let mut duplicates = 0usize;

    for bar in raw {
        match bar.to_clean() {
            Some(clean) => {
                if by_date.insert(clean.date, clean).is_some() {
                    duplicates += 1;
                }
            }
            None => incomplete += 1,
        }
    }

    if duplicates > 0 {
        tracing::warn!(
            "Collapsed {} records sharing a trading date (kept the last of each)",
            duplicates
        );
    }
    tracing::debug!(
        "Cleaned price series: {} raw, {} kept, {} incomplete dropped",
        raw.len(),
        by_date.len(),
        incomplete
    );

    CleanSeries {
        bars: by_date.into_values().collect(),
    }
}

/// Cleans a raw series and attaches the 20- and 50-record moving averages.
///
/// Returns [`SeriesError::EmptySeries`] when nothing survives cleaning.
pub fn prepare(raw: &[RawBar]) -> Result<DerivedSeries, SeriesError> {
    DerivedSeries::from_clean(&clean(raw))
}

/// Trailing simple moving average.
///
/// Position `i` holds the mean of `values[i + 1 - window..=i]`, or `None`
/// while fewer than `window` values are available. A zero window defines
/// nothing.
pub fn simple_moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                let sum: f64 = values[i + 1 - window..=i].iter().sum();
                Some(sum / window as f64)
            }
        })
        .collect()
}

/// Change between the two most recent closes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatestChange {
    pub last_date: NaiveDate,
    pub previous_date: NaiveDate,
    pub last_close: f64,
    pub previous_close: f64,
    pub delta: f64,
    /// `None` when the previous close is zero.
    pub delta_percent: Option<f64>,
}

impl LatestChange {
    /// The percentage change, or [`SeriesError::DivisionByZero`].
    pub fn percent_change(&self) -> Result<f64, SeriesError> {
        self.delta_percent.ok_or(SeriesError::DivisionByZero)
    }
}

/// Summarizes the last two records of a clean or derived series.
pub fn summarize_latest<S: PriceSeries + ?Sized>(series: &S) -> Result<LatestChange, SeriesError> {
    let bars = series.bars();
    let [.., previous, last] = bars else {
        return Err(SeriesError::InsufficientHistory {
            available: bars.len(),
        });
    };

    let last_close = last.close();
    let previous_close = previous.close();
    let delta = last_close - previous_close;
    let delta_percent = if previous_close == 0.0 {
        None
    } else {
        Some(delta / previous_close * 100.0)
    };

    Ok(LatestChange {
        last_date: last.date(),
        previous_date: previous.date(),
        last_close,
        previous_close,
        delta,
        delta_percent,
    })
}
