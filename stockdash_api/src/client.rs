//! HTTP client for the Yahoo Finance chart and quote-summary endpoints.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    query::{ChartQuery, Query, QuoteSummaryQuery},
    types::{ChartResponse, QuoteSummaryResponse},
    user_agent::get_user_agent,
    Error,
};

/// HTTP client for Yahoo Finance.
///
/// Sends requests with browser-like headers and a randomized user agent to
/// avoid being blocked. Each request builds a fresh `reqwest::Client` with
/// a 30-second timeout; all of them share one cookie jar.
///
/// `quoteSummary` only answers requests that carry a session cookie and the
/// matching crumb. The crumb is fetched on first use and cached until Yahoo
/// answers 401.
pub struct Client {
    /// Base URL for the API. Defaults to `https://query1.finance.yahoo.com`.
    base_api_url: String,
    /// Page that hands out the session cookie. Defaults to `https://fc.yahoo.com`.
    cookie_url: String,
    cookies: Arc<Jar>,
    crumb: Mutex<Option<String>>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production Yahoo Finance API.
    pub fn new() -> Self {
        Self {
            base_api_url: "https://query1.finance.yahoo.com".to_string(),
            cookie_url: "https://fc.yahoo.com".to_string(),
            cookies: Arc::new(Jar::default()),
            crumb: Mutex::new(None),
        }
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    /// The session cookie is requested from the same host.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            cookie_url: base.clone(),
            base_api_url: base,
            cookies: Arc::new(Jar::default()),
            crumb: Mutex::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    fn get_url(&self, segments: &[&str], query: &impl Query) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_api_url).map_err(|e| {
            tracing::error!("Invalid base URL {}: {}", self.base_api_url, e);
            Error::RequestFailed
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                tracing::error!("Base URL cannot carry a path: {}", self.base_api_url);
                Error::RequestFailed
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(query.add_to_url(&url))
    }

    fn http(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(Duration::from_secs(30))
            .cookie_provider(Arc::clone(&self.cookies))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })
    }

    async fn fetch_text(&self, url: &str) -> Result<(StatusCode, String), Error> {
        tracing::debug!("GET {}", url);
        let resp = self
            .http()?
            .get(url)
            .header("accept", "application/json, text/plain, */*")
            .header("accept-language", "en-US,en;q=0.9")
            .header("origin", "https://finance.yahoo.com")
            .header("referer", "https://finance.yahoo.com")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;
        Ok((status, body))
    }

    async fn get<T>(&self, url: Url) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let (status, body) = self.fetch_text(url.as_str()).await?;

        if status == StatusCode::NOT_FOUND {
            tracing::warn!("Resource not found: {}", truncate_body(&body));
            return Err(Error::NotFound);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited);
        }
        if status == StatusCode::UNAUTHORIZED {
            let snippet = truncate_body(&body);
            tracing::warn!("Request rejected as unauthorized: {}", snippet);
            return Err(Error::Unauthorized(snippet));
        }
        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::ParseFailed(e.to_string())
        })
    }

    fn cached_crumb(&self) -> Option<String> {
        match self.crumb.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn store_crumb(&self, crumb: Option<String>) {
        match self.crumb.lock() {
            Ok(mut guard) => *guard = crumb,
            Err(poisoned) => *poisoned.into_inner() = crumb,
        }
    }

    /// Returns the session crumb, performing the cookie handshake if needed.
    async fn crumb(&self) -> Result<String, Error> {
        if let Some(crumb) = self.cached_crumb() {
            return Ok(crumb);
        }

        // Any status is fine here; only the Set-Cookie header matters.
        self.fetch_text(&self.cookie_url).await?;

        let crumb_url = format!("{}/v1/test/getcrumb", self.base_api_url);
        let (status, body) = self.fetch_text(&crumb_url).await?;
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited);
        }
        let crumb = body.trim();
        let looks_like_page = crumb.contains(|c: char| c == '<' || c == '{' || c.is_whitespace());
        if !status.is_success() || crumb.is_empty() || looks_like_page {
            let snippet = truncate_body(&body);
            tracing::warn!("Crumb handshake failed with status {}: {}", status, snippet);
            return Err(Error::Unauthorized(format!("no crumb issued (HTTP {})", status.as_u16())));
        }

        tracing::debug!("Obtained Yahoo crumb");
        self.store_crumb(Some(crumb.to_string()));
        Ok(crumb.to_string())
    }

    /// Fetches daily (or coarser) OHLCV bars for one symbol.
    pub async fn get_chart(&self, symbol: &str, query: &ChartQuery) -> Result<ChartResponse, Error> {
        let url = self.get_url(&["v8", "finance", "chart", symbol], query)?;
        self.get::<ChartResponse>(url).await
    }

    /// Fetches company fundamentals for one symbol. Requires a crumb, see [`Client`].
    pub async fn get_quote_summary(
        &self,
        symbol: &str,
        query: &QuoteSummaryQuery,
    ) -> Result<QuoteSummaryResponse, Error> {
        let crumb = self.crumb().await?;
        let mut url = self.get_url(&["v10", "finance", "quoteSummary", symbol], query)?;
        url.query_pairs_mut().append_pair("crumb", &crumb);
        let result = self.get::<QuoteSummaryResponse>(url).await;
        if matches!(result, Err(Error::Unauthorized(_))) {
            self.store_crumb(None);
        }
        result
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
