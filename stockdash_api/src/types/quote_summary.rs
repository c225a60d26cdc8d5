use serde::{Deserialize, Serialize};

use super::ApiErrorBody;

/// Envelope returned by `/v10/finance/quoteSummary/{symbol}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    pub quote_summary: QuoteSummary,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuoteSummary {
    pub result: Option<Vec<QuoteSummaryResult>>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

impl QuoteSummaryResponse {
    pub fn first_result(&self) -> Option<&QuoteSummaryResult> {
        self.quote_summary.result.as_ref().and_then(|r| r.first())
    }
}

/// Only the modules named in the query are present; the rest stay `None`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResult {
    #[serde(default)]
    pub price: Option<PriceModule>,
    #[serde(default)]
    pub summary_detail: Option<SummaryDetailModule>,
    #[serde(default)]
    pub asset_profile: Option<AssetProfileModule>,
    #[serde(default)]
    pub default_key_statistics: Option<KeyStatisticsModule>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PriceModule {
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub market_cap: Option<RawValue>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDetailModule {
    #[serde(default, rename = "trailingPE")]
    pub trailing_pe: Option<RawValue>,
    /// Fraction, e.g. `0.0044` for 0.44%.
    #[serde(default)]
    pub dividend_yield: Option<RawValue>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AssetProfileModule {
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatisticsModule {
    #[serde(default)]
    pub price_to_book: Option<RawValue>,
}

/// Yahoo's `{ "raw": 1.23, "fmt": "1.23" }` number wrapper. A missing value
/// is sent as `{}`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RawValue {
    #[serde(default)]
    pub raw: Option<f64>,
    #[serde(default)]
    pub fmt: Option<String>,
}

impl RawValue {
    /// The numeric value, if present and finite.
    pub fn value(&self) -> Option<f64> {
        self.raw.filter(|v| v.is_finite())
    }
}
