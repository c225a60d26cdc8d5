//! Library layer for stockdash: price series preparation, the market data
//! provider seam, and dashboard assembly.
//!
//! Wraps the `stockdash_api` Yahoo Finance client with a provider adapter
//! that flattens its nested payloads, then cleans the history and attaches
//! 20- and 50-period simple moving averages.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod profile;
pub mod provider;
pub mod series;
pub mod validation;

pub use stockdash_api;

pub use config::{DashboardConfig, LookbackPeriod};
pub use dashboard::{load_dashboard, load_series, Dashboard};
pub use error::{DashboardError, ProviderError, SeriesError};
pub use profile::CompanyProfile;
pub use provider::{MarketDataProvider, YahooProvider};
pub use series::{
    clean, prepare, simple_moving_average, summarize_latest, CleanBar, CleanSeries, DerivedBar,
    DerivedSeries, LatestChange, RawBar, RawSeries,
};
