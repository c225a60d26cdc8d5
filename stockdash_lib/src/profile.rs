//! Company fundamentals shown next to the chart.

use serde::{Deserialize, Serialize};

/// Company fundamentals. Every field is optional: the provider omits
/// values freely, and placeholders belong to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub trailing_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    /// Fraction, e.g. `0.0051` for 0.51%.
    pub dividend_yield: Option<f64>,
    pub market_cap: Option<u64>,
}

impl CompanyProfile {
    /// True when the provider supplied nothing at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
