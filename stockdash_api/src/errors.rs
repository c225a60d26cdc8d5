//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unusable URL).
    #[error("Request failed")]
    RequestFailed,
    /// The symbol is unknown to Yahoo Finance (HTTP 404).
    #[error("Symbol not found")]
    NotFound,
    /// Yahoo Finance throttled the request (HTTP 429).
    #[error("Rate limited by Yahoo Finance (HTTP 429)")]
    RateLimited,
    /// Yahoo refused the session: HTTP 401 or no crumb could be obtained.
    #[error("Unauthorized by Yahoo Finance: {0}")]
    Unauthorized(String),
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The body was not the JSON shape we expected.
    #[error("Failed to parse response: {0}")]
    ParseFailed(String),
}

/// A string that is not one of Yahoo's `range` values.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown range '{0}'")]
pub struct ParseRangeError(pub String);
