use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use super::Query;
use crate::errors::ParseRangeError;

/// How far back the chart endpoint should reach, sent as the `range` parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Range {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    /// Five years of history. This is the default.
    #[default]
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "max")]
    Max,
}

impl Range {
    /// Every range the endpoint accepts, shortest first.
    pub const ALL: [Range; 9] = [
        Range::OneMonth,
        Range::ThreeMonths,
        Range::SixMonths,
        Range::OneYear,
        Range::TwoYears,
        Range::FiveYears,
        Range::TenYears,
        Range::YearToDate,
        Range::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Range::OneMonth => "1mo",
            Range::ThreeMonths => "3mo",
            Range::SixMonths => "6mo",
            Range::OneYear => "1y",
            Range::TwoYears => "2y",
            Range::FiveYears => "5y",
            Range::TenYears => "10y",
            Range::YearToDate => "ytd",
            Range::Max => "max",
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Range {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Range::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseRangeError(s.to_string()))
    }
}

/// Bar width, sent as the `interval` parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interval {
    /// One bar per trading day. This is the default.
    #[default]
    OneDay,
    OneWeek,
    OneMonth,
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Interval::OneDay => "1d",
            Interval::OneWeek => "1wk",
            Interval::OneMonth => "1mo",
        };
        write!(f, "{}", s)
    }
}

/// Query for `/v8/finance/chart/{symbol}`.
#[derive(Clone, Debug, Default)]
pub struct ChartQuery {
    pub range: Range,
    pub interval: Interval,
    /// Include pre- and post-market bars. Off by default.
    pub include_pre_post: bool,
    /// Ask for dividend and split events alongside the bars.
    pub with_events: bool,
}

impl Query for ChartQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("range", self.range.as_str())
            .append_pair("interval", &self.interval.to_string())
            .append_pair("includePrePost", &self.include_pre_post.to_string());
        if self.with_events {
            url.query_pairs_mut().append_pair("events", "div,split");
        }
        url
    }
}

impl ChartQuery {
    pub fn with_range(mut self, range: Range) -> Self {
        self.range = range;
        self
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_pre_post(mut self, include_pre_post: bool) -> Self {
        self.include_pre_post = include_pre_post;
        self
    }

    pub fn with_events(mut self, with_events: bool) -> Self {
        self.with_events = with_events;
        self
    }
}
