//! Typed errors for the initiatives library.
//!
//! Extraction itself is total; these errors come from content sources.

use thiserror::Error;

/// Errors that can occur while fetching pages from a content source.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The API key was rejected (HTTP 401)
    #[error("invalid API key")]
    Unauthorized,

    /// Rate limit exceeded (HTTP 429)
    #[error("rate limit exceeded")]
    RateLimitExceeded,

    /// Other non-success response
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The remote crawl job reported failure
    #[error("crawl failed: {reason}")]
    CrawlFailed { reason: String },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Polling gave up before the crawl completed
    #[error("timeout crawling: {url}")]
    Timeout { url: String },

    /// Missing or invalid configuration
    #[error("config error: {0}")]
    Config(String),
}

impl CrawlError {
    /// Map a non-success HTTP status and body to an error.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 => CrawlError::Unauthorized,
            429 => CrawlError::RateLimitExceeded,
            _ => CrawlError::Api {
                status,
                message: api_message(body),
            },
        }
    }
}

/// Prefer the `message` field of a JSON error body, else the raw body.
fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(240).collect())
}

/// Result type alias for crawl operations.
pub type CrawlResult<T> = std::result::Result<T, CrawlError>;
