mod chart;
pub use self::chart::{AdjCloseIndicator, Chart, ChartMeta, ChartResponse, ChartResult, Indicators, QuoteIndicator};

mod quote_summary;
pub use self::quote_summary::{
    AssetProfileModule, KeyStatisticsModule, PriceModule, QuoteSummary, QuoteSummaryResponse,
    QuoteSummaryResult, RawValue, SummaryDetailModule,
};

mod meta;
pub use self::meta::ApiErrorBody;
