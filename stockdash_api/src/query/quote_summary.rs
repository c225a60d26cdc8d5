use std::fmt;

use url::Url;

use super::Query;

/// A named block of the quote-summary payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuoteSummaryModule {
    /// Display name and market capitalization.
    Price,
    /// Trailing P/E and dividend yield.
    SummaryDetail,
    /// Sector and industry.
    AssetProfile,
    /// Price/book ratio.
    DefaultKeyStatistics,
}

impl fmt::Display for QuoteSummaryModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuoteSummaryModule::Price => "price",
            QuoteSummaryModule::SummaryDetail => "summaryDetail",
            QuoteSummaryModule::AssetProfile => "assetProfile",
            QuoteSummaryModule::DefaultKeyStatistics => "defaultKeyStatistics",
        };
        write!(f, "{}", s)
    }
}

/// Query for `/v10/finance/quoteSummary/{symbol}`.
#[derive(Clone, Debug)]
pub struct QuoteSummaryQuery {
    pub modules: Vec<QuoteSummaryModule>,
}

impl Default for QuoteSummaryQuery {
    fn default() -> Self {
        Self {
            modules: vec![
                QuoteSummaryModule::Price,
                QuoteSummaryModule::SummaryDetail,
                QuoteSummaryModule::AssetProfile,
                QuoteSummaryModule::DefaultKeyStatistics,
            ],
        }
    }
}

impl Query for QuoteSummaryQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        let modules = self
            .modules
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(",");
        url.query_pairs_mut().append_pair("modules", &modules);
        url
    }
}

impl QuoteSummaryQuery {
    /// Starts from an empty module list.
    pub fn empty() -> Self {
        Self { modules: vec![] }
    }

    pub fn with_module(mut self, module: QuoteSummaryModule) -> Self {
        if !self.modules.contains(&module) {
            self.modules.push(module);
        }
        self
    }
}
