mod client;
mod errors;
mod query;
pub mod types;
mod user_agent;
pub use self::client::Client;
pub use self::errors::{Error, ParseRangeError};
pub use self::query::{ChartQuery, Interval, Query, QuoteSummaryModule, QuoteSummaryQuery, Range};
