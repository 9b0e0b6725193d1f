//! Ingestor trait - the content source feeding the extractor.
//!
//! An ingestor turns a starting URL into a list of [`Page`]s. Where the
//! pages come from (a crawling API, plain HTTP, a fixture) is up to the
//! implementation; the extractor only sees `{ text?, url? }` records.
//!
//! ```rust,ignore
//! use initiatives::{DiscoverConfig, Ingestor, extract_initiatives};
//!
//! let config = DiscoverConfig::new("https://example.com").with_limit(10);
//! let pages = ingestor.discover(&config).await?;
//! let ranked = extract_initiatives(&pages, &config.url);
//! ```

use async_trait::async_trait;

use crate::error::{CrawlError, CrawlResult};
use crate::types::page::Page;

/// Configuration for discovery operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverConfig {
    /// Starting URL
    pub url: String,

    /// Maximum number of pages to discover
    pub limit: usize,

    /// Maximum link depth from the starting URL (0 = single page)
    pub max_depth: usize,

    /// URL path patterns to include
    pub include_patterns: Vec<String>,

    /// URL path patterns to exclude
    pub exclude_patterns: Vec<String>,
}

impl DiscoverConfig {
    /// Create a new config for discovering from a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            limit: 10,
            max_depth: 2,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }

    /// Set the page limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the max depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Add an include pattern.
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Validate the starting URL (http or https with a host).
    pub fn validate(&self) -> CrawlResult<()> {
        let parsed = url::Url::parse(&self.url).map_err(|_| CrawlError::InvalidUrl {
            url: self.url.clone(),
        })?;
        let web = matches!(parsed.scheme(), "http" | "https");
        if !web || parsed.host_str().is_none() {
            return Err(CrawlError::InvalidUrl {
                url: self.url.clone(),
            });
        }
        Ok(())
    }
}

/// Content source producing pages for initiative extraction.
#[async_trait]
pub trait Ingestor: Send + Sync {
    /// Discover and fetch up to `config.limit` pages starting at `config.url`.
    async fn discover(&self, config: &DiscoverConfig) -> CrawlResult<Vec<Page>>;

    /// Fetch specific URLs.
    ///
    /// May return fewer pages than requested if some fail.
    async fn fetch_specific(&self, urls: &[String]) -> CrawlResult<Vec<Page>>;

    /// Fetch a single URL.
    async fn fetch_one(&self, url: &str) -> CrawlResult<Page> {
        let pages = self.fetch_specific(&[url.to_string()]).await?;
        pages
            .into_iter()
            .next()
            .ok_or_else(|| CrawlError::Http(format!("Failed to fetch {}", url).into()))
    }

    /// Get the ingestor name (for logging).
    fn name(&self) -> &str {
        "unknown"
    }
}
