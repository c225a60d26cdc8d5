use serde::{Deserialize, Serialize};

use super::ApiErrorBody;

/// Envelope returned by `/v8/finance/chart/{symbol}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

impl ChartResponse {
    /// The single result block a one-symbol request produces, if any.
    pub fn first_result(&self) -> Option<&ChartResult> {
        self.chart.result.as_ref().and_then(|r| r.first())
    }
}

/// One symbol's bars. Prices arrive as parallel column arrays indexed
/// alongside `timestamp`; any cell may be `null`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChartResult {
    pub meta: ChartMeta,
    /// Bar open times in unix seconds. Absent when the range holds no bars.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub exchange_name: Option<String>,
    #[serde(default)]
    pub instrument_type: Option<String>,
    /// Exchange offset from UTC in seconds at request time.
    #[serde(default)]
    pub gmtoffset: i32,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub exchange_timezone_name: Option<String>,
    #[serde(default)]
    pub regular_market_price: Option<f64>,
    #[serde(default)]
    pub data_granularity: Option<String>,
    #[serde(default)]
    pub range: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteIndicator>,
    #[serde(default)]
    pub adjclose: Vec<AdjCloseIndicator>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct QuoteIndicator {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<u64>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AdjCloseIndicator {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}
