//! Market data provider seam and the Yahoo Finance adapter behind it.
//!
//! The adapter is where the provider's layout stops: parallel column arrays
//! (`indicators.quote[0].close[i]`) become one [`RawBar`] per timestamp, and
//! `{raw, fmt}` number wrappers become plain optional fields on
//! [`CompanyProfile`]. Nothing nested reaches the series processor.

use std::future::Future;

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use stockdash_api::types::{ChartMeta, ChartResponse, QuoteSummaryResponse, QuoteSummaryResult};
use stockdash_api::{ChartQuery, Client, QuoteSummaryQuery};

use crate::config::{base_url_from_env, LookbackPeriod};
use crate::error::ProviderError;
use crate::profile::CompanyProfile;
use crate::series::{RawBar, RawSeries};

/// Source of raw price history and company fundamentals.
pub trait MarketDataProvider {
    /// Daily bars for `symbol` covering `lookback`, oldest first.
    fn fetch_history(
        &self,
        symbol: &str,
        lookback: LookbackPeriod,
    ) -> impl Future<Output = Result<RawSeries, ProviderError>> + Send;

    /// Company fundamentals for `symbol`; any field may be absent.
    fn fetch_profile(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<CompanyProfile, ProviderError>> + Send;
}

/// [`MarketDataProvider`] backed by the Yahoo Finance HTTP API.
pub struct YahooProvider {
    client: Client,
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooProvider {
    /// Creates a provider pointing at production Yahoo Finance.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Creates a provider with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::with_base_url(base_url),
        }
    }

    /// Honors `STOCKDASH_BASE_URL` when set, otherwise production.
    pub fn from_env() -> Self {
        match base_url_from_env() {
            Some(url) => {
                tracing::debug!("Using provider base URL from environment: {}", url);
                Self::with_base_url(&url)
            }
            None => Self::new(),
        }
    }
}

impl MarketDataProvider for YahooProvider {
    async fn fetch_history(
        &self,
        symbol: &str,
        lookback: LookbackPeriod,
    ) -> Result<RawSeries, ProviderError> {
        let query = ChartQuery::default().with_range(lookback);
        let resp = self
            .client
            .get_chart(symbol, &query)
            .await
            .map_err(|e| map_api_error(symbol, e))?;
        let bars = raw_series_from_chart(symbol, &resp)?;
        tracing::info!("Fetched {} bars for {} ({})", bars.len(), symbol, lookback);
        Ok(bars)
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, ProviderError> {
        let resp = self
            .client
            .get_quote_summary(symbol, &QuoteSummaryQuery::default())
            .await
            .map_err(|e| map_api_error(symbol, e))?;
        profile_from_summary(symbol, &resp)
    }
}

fn map_api_error(symbol: &str, err: stockdash_api::Error) -> ProviderError {
    match err {
        stockdash_api::Error::NotFound => ProviderError::UnknownSymbol(symbol.to_string()),
        stockdash_api::Error::RateLimited => ProviderError::RateLimited,
        stockdash_api::Error::Unauthorized(msg) => ProviderError::Unauthorized(msg),
        other => ProviderError::Api(other),
    }
}

fn envelope_error(
    symbol: &str,
    error: Option<&stockdash_api::types::ApiErrorBody>,
) -> ProviderError {
    match error {
        Some(err) if err.code.eq_ignore_ascii_case("Not Found") => {
            ProviderError::UnknownSymbol(symbol.to_string())
        }
        Some(err) => ProviderError::Upstream(match &err.description {
            Some(desc) => format!("{}: {}", err.code, desc),
            None => err.code.clone(),
        }),
        None => ProviderError::NoData(symbol.to_string()),
    }
}

fn cell<T: Copy>(column: Option<&Vec<Option<T>>>, index: usize) -> Option<T> {
    column.and_then(|c| c.get(index).copied().flatten())
}

/// Clock used to stamp bars with the exchange's local time.
enum ExchangeClock {
    /// IANA zone from `meta.exchangeTimezoneName`, resolved per bar so
    /// daylight saving is honored.
    Named(Tz),
    /// `meta.gmtoffset`, the offset in force when the request was made.
    Fixed(FixedOffset),
}

impl ExchangeClock {
    fn from_meta(symbol: &str, meta: &ChartMeta) -> Result<Self, ProviderError> {
        if let Some(name) = meta.exchange_timezone_name.as_deref() {
            match name.parse::<Tz>() {
                Ok(tz) => return Ok(Self::Named(tz)),
                Err(_) => tracing::warn!(
                    "Unknown exchange timezone '{}' for {}; using gmtoffset {}",
                    name,
                    symbol,
                    meta.gmtoffset
                ),
            }
        }
        FixedOffset::east_opt(meta.gmtoffset)
            .map(Self::Fixed)
            .ok_or_else(|| ProviderError::Upstream(format!("invalid UTC offset {}", meta.gmtoffset)))
    }

    fn localize(&self, utc: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Self::Named(tz) => utc.with_timezone(tz).fixed_offset(),
            Self::Fixed(offset) => utc.with_timezone(offset),
        }
    }
}

/// Flattens a chart payload into one [`RawBar`] per timestamp.
///
/// Cells missing from a short or `null`-filled column come through as `None`
/// for the cleaning step to deal with. Each timestamp carries the offset the
/// exchange's timezone had on that day; `meta.gmtoffset` is only used when
/// the zone name is missing or unknown.
pub fn raw_series_from_chart(symbol: &str, resp: &ChartResponse) -> Result<RawSeries, ProviderError> {
    let Some(result) = resp.first_result() else {
        return Err(envelope_error(symbol, resp.chart.error.as_ref()));
    };

    let clock = ExchangeClock::from_meta(symbol, &result.meta)?;
    let quote = result.indicators.quote.first();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let Some(utc) = DateTime::from_timestamp(*ts, 0) else {
            tracing::warn!("Skipping out-of-range timestamp {} for {}", ts, symbol);
            continue;
        };
        bars.push(RawBar {
            timestamp: clock.localize(utc),
            open: cell(quote.map(|q| &q.open), i),
            high: cell(quote.map(|q| &q.high), i),
            low: cell(quote.map(|q| &q.low), i),
            close: cell(quote.map(|q| &q.close), i),
            volume: cell(quote.map(|q| &q.volume), i),
        });
    }

    if bars.is_empty() {
        return Err(ProviderError::NoData(symbol.to_string()));
    }
    Ok(bars)
}

/// Flattens a quote-summary payload into a [`CompanyProfile`].
pub fn profile_from_summary(
    symbol: &str,
    resp: &QuoteSummaryResponse,
) -> Result<CompanyProfile, ProviderError> {
    match resp.first_result() {
        Some(result) => Ok(profile_from_result(result)),
        None => Err(envelope_error(symbol, resp.quote_summary.error.as_ref())),
    }
}

fn non_empty(s: Option<&String>) -> Option<String> {
    s.map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}

fn profile_from_result(result: &QuoteSummaryResult) -> CompanyProfile {
    let price = result.price.as_ref();
    let detail = result.summary_detail.as_ref();
    let stats = result.default_key_statistics.as_ref();

    CompanyProfile {
        name: price
            .and_then(|p| non_empty(p.long_name.as_ref()).or_else(|| non_empty(p.short_name.as_ref()))),
        sector: result
            .asset_profile
            .as_ref()
            .and_then(|a| non_empty(a.sector.as_ref())),
        trailing_pe: detail
            .and_then(|d| d.trailing_pe.as_ref())
            .and_then(|v| v.value()),
        price_to_book: stats
            .and_then(|s| s.price_to_book.as_ref())
            .and_then(|v| v.value()),
        dividend_yield: detail
            .and_then(|d| d.dividend_yield.as_ref())
            .and_then(|v| v.value()),
        market_cap: price
            .and_then(|p| p.market_cap.as_ref())
            .and_then(|v| v.value())
            .filter(|v| *v >= 0.0)
            .map(|v| v.round() as u64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn chart_fixture() -> ChartResponse {
        let json = include_str!("../../stockdash_api/tests/fixtures/chart_aapl.json");
        serde_json::from_str(json).unwrap()
    }

    fn summary_fixture(name: &str) -> QuoteSummaryResponse {
        let json = std::fs::read_to_string(format!(
            "{}/../stockdash_api/tests/fixtures/{}",
            env!("CARGO_MANIFEST_DIR"),
            name
        ))
        .unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_chart_flattens_columns_into_rows() {
        let bars = raw_series_from_chart("AAPL", &chart_fixture()).unwrap();
        assert_eq!(bars.len(), 6);

        let first = &bars[0];
        assert_eq!(first.open, Some(192.9));
        assert_eq!(first.high, Some(194.99));
        assert_eq!(first.low, Some(192.52));
        assert_eq!(first.close, Some(194.03));
        assert_eq!(first.volume, Some(50080500));
    }

    #[test]
    fn test_chart_keeps_null_cells_as_missing() {
        let bars = raw_series_from_chart("AAPL", &chart_fixture()).unwrap();
        assert_eq!(bars[2].close, None);
        assert_eq!(bars[2].open, Some(195.4));
    }

    #[test]
    fn test_chart_timestamps_carry_exchange_offset() {
        let bars = raw_series_from_chart("AAPL", &chart_fixture()).unwrap();
        let ts = bars[0].timestamp;
        assert_eq!(ts.offset().local_minus_utc(), -14400);
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(ts.format("%H:%M").to_string(), "09:30");
    }

    fn chart_at(timestamps: &[i64], gmtoffset: i32, zone: Option<&str>) -> ChartResponse {
        let n = timestamps.len();
        serde_json::from_value(serde_json::json!({
            "chart": {
                "result": [{
                    "meta": {
                        "symbol": "EURUSD=X",
                        "gmtoffset": gmtoffset,
                        "exchangeTimezoneName": zone
                    },
                    "timestamp": timestamps,
                    "indicators": {
                        "quote": [{
                            "open": vec![1.08; n],
                            "high": vec![1.09; n],
                            "low": vec![1.07; n],
                            "close": vec![1.085; n],
                            "volume": vec![0; n]
                        }]
                    }
                }],
                "error": null
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_summer_bars_use_daylight_offset_not_request_offset() {
        // 00:00 BST on 2024-07-15 and 2024-07-16, fetched while London is on GMT.
        let resp = chart_at(&[1720998000, 1721084400], 0, Some("Europe/London"));
        let bars = raw_series_from_chart("EURUSD=X", &resp).unwrap();
        assert_eq!(bars[0].timestamp.offset().local_minus_utc(), 3600);

        let dates: Vec<String> = crate::series::prepare(&bars)
            .unwrap()
            .bars()
            .iter()
            .map(|b| b.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-07-15", "2024-07-16"]);
    }

    #[test]
    fn test_winter_bar_uses_standard_offset() {
        // 00:00 EST on 2024-01-02, fetched while New York is on EDT.
        let resp = chart_at(&[1704171600], -14400, Some("America/New_York"));
        let bars = raw_series_from_chart("ES=F", &resp).unwrap();
        let ts = bars[0].timestamp;
        assert_eq!(ts.offset().local_minus_utc(), -18000);
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_missing_or_unknown_zone_falls_back_to_gmtoffset() {
        for zone in [None, Some("Mars/Olympus_Mons")] {
            let resp = chart_at(&[1704153600], 3600, zone);
            let bars = raw_series_from_chart("X", &resp).unwrap();
            assert_eq!(bars[0].timestamp.offset().local_minus_utc(), 3600);
            assert_eq!(bars[0].timestamp.format("%H:%M").to_string(), "01:00");
        }
    }

    #[test]
    fn test_chart_short_column_yields_missing_cells() {
        let mut resp = chart_fixture();
        let result = &mut resp.chart.result.as_mut().unwrap()[0];
        result.indicators.quote[0].volume.truncate(4);
        let bars = raw_series_from_chart("AAPL", &resp).unwrap();
        assert_eq!(bars.len(), 6);
        assert_eq!(bars[4].volume, None);
        assert_eq!(bars[5].volume, None);
    }

    #[test]
    fn test_chart_without_quote_block_is_all_missing() {
        let mut resp = chart_fixture();
        resp.chart.result.as_mut().unwrap()[0].indicators.quote.clear();
        let bars = raw_series_from_chart("AAPL", &resp).unwrap();
        assert!(bars.iter().all(|b| b.close.is_none() && b.open.is_none()));
    }

    #[test]
    fn test_chart_without_timestamps_is_no_data() {
        let json = include_str!("../../stockdash_api/tests/fixtures/chart_empty.json");
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let err = raw_series_from_chart("NEWCO", &resp).unwrap_err();
        assert!(matches!(err, ProviderError::NoData(ref s) if s == "NEWCO"));
    }

    #[test]
    fn test_chart_error_envelope_is_unknown_symbol() {
        let json = include_str!("../../stockdash_api/tests/fixtures/chart_not_found.json");
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let err = raw_series_from_chart("NOPE", &resp).unwrap_err();
        assert!(matches!(err, ProviderError::UnknownSymbol(ref s) if s == "NOPE"));
    }

    #[test]
    fn test_chart_other_error_envelope_is_upstream() {
        let resp: ChartResponse = serde_json::from_value(serde_json::json!({
            "chart": {
                "result": null,
                "error": { "code": "Bad Request", "description": "Invalid input - range" }
            }
        }))
        .unwrap();
        let err = raw_series_from_chart("AAPL", &resp).unwrap_err();
        match err {
            ProviderError::Upstream(msg) => {
                assert_eq!(msg, "Bad Request: Invalid input - range")
            }
            other => panic!("expected Upstream, got {:?}", other),
        }
    }

    #[test]
    fn test_profile_full() {
        let profile = profile_from_summary("AAPL", &summary_fixture("quote_summary_aapl.json")).unwrap();
        assert_eq!(profile.name.as_deref(), Some("Apple Inc."));
        assert_eq!(profile.sector.as_deref(), Some("Technology"));
        assert_eq!(profile.trailing_pe, Some(30.67));
        assert_eq!(profile.price_to_book, Some(40.58));
        assert_eq!(profile.dividend_yield, Some(0.0051));
        assert_eq!(profile.market_cap, Some(3019137458176));
    }

    #[test]
    fn test_profile_missing_values_stay_absent() {
        let profile =
            profile_from_summary("RIVN", &summary_fixture("quote_summary_partial.json")).unwrap();
        assert_eq!(profile.name.as_deref(), Some("Rivian Automotive, Inc."));
        assert_eq!(profile.sector.as_deref(), Some("Consumer Cyclical"));
        assert_eq!(profile.trailing_pe, None);
        assert_eq!(profile.dividend_yield, None);
        assert_eq!(profile.price_to_book, None);
        assert_eq!(profile.market_cap, Some(11894213632));
    }

    #[test]
    fn test_profile_without_result_is_error() {
        let resp: QuoteSummaryResponse = serde_json::from_value(serde_json::json!({
            "quoteSummary": {
                "result": null,
                "error": { "code": "Not Found", "description": "Quote not found for symbol: ZZZZ" }
            }
        }))
        .unwrap();
        let err = profile_from_summary("ZZZZ", &resp).unwrap_err();
        assert!(matches!(err, ProviderError::UnknownSymbol(_)));
    }

    #[test]
    fn test_map_api_error() {
        assert!(matches!(
            map_api_error("X", stockdash_api::Error::NotFound),
            ProviderError::UnknownSymbol(_)
        ));
        assert!(matches!(
            map_api_error("X", stockdash_api::Error::RateLimited),
            ProviderError::RateLimited
        ));
        assert!(matches!(
            map_api_error("X", stockdash_api::Error::Unauthorized("Invalid Crumb".into())),
            ProviderError::Unauthorized(ref m) if m == "Invalid Crumb"
        ));
        assert!(matches!(
            map_api_error("X", stockdash_api::Error::RequestFailed),
            ProviderError::Api(stockdash_api::Error::RequestFailed)
        ));
    }
}
