//! Firecrawl-based ingestor.
//!
//! Starts a crawl job, polls it until completion and maps each crawled
//! document to a [`Page`] (`markdown` → `text`, `metadata.sourceURL` → `url`).
//!
//! Requires the `firecrawl` feature (enabled by default).

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{CrawlError, CrawlResult};
use crate::security::SecretString;
use crate::traits::ingestor::{DiscoverConfig, Ingestor};
use crate::types::page::Page;

/// Default Firecrawl API base URL.
pub const FIRECRAWL_BASE_URL: &str = "https://api.firecrawl.dev";

/// Firecrawl-based ingestor.
///
/// The API key is an explicit constructor argument; nothing is read from
/// or written to ambient state except by [`FirecrawlIngestor::from_env`].
///
/// # Example
///
/// ```rust,ignore
/// use initiatives::{DiscoverConfig, FirecrawlIngestor, Ingestor};
///
/// let ingestor = FirecrawlIngestor::new(api_key)?;
/// let pages = ingestor.discover(&DiscoverConfig::new("https://example.com")).await?;
/// ```
pub struct FirecrawlIngestor {
    client: Client,
    api_key: SecretString,
    base_url: String,
    /// Timeout for polling crawl status (seconds)
    poll_timeout_secs: u64,
    /// Interval between poll attempts (seconds)
    poll_interval_secs: u64,
}

// Request/Response types for Firecrawl API

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: Vec<&'static str>,
}

#[derive(Deserialize)]
struct ScrapeResponse {
    success: bool,
    data: Option<CrawlPageData>,
}

#[derive(Serialize)]
struct CrawlRequest<'a> {
    url: &'a str,
    limit: usize,
    #[serde(rename = "maxDepth")]
    max_depth: usize,
    #[serde(rename = "scrapeOptions")]
    scrape_options: CrawlScrapeOptions,
    #[serde(rename = "includePaths", skip_serializing_if = "Vec::is_empty")]
    include_paths: Vec<String>,
    #[serde(rename = "excludePaths", skip_serializing_if = "Vec::is_empty")]
    exclude_paths: Vec<String>,
}

#[derive(Serialize)]
struct CrawlScrapeOptions {
    formats: Vec<&'static str>,
    #[serde(rename = "onlyMainContent")]
    only_main_content: bool,
}

#[derive(Deserialize)]
struct CrawlStartResponse {
    success: bool,
    id: Option<String>,
}

#[derive(Deserialize)]
struct CrawlStatusResponse {
    status: String,
    completed: Option<u32>,
    total: Option<u32>,
    #[serde(default)]
    data: Vec<CrawlPageData>,
}

#[derive(Deserialize)]
struct CrawlPageData {
    markdown: Option<String>,
    metadata: Option<PageMetadata>,
}

#[derive(Deserialize)]
struct PageMetadata {
    #[serde(rename = "sourceURL")]
    source_url: Option<String>,
}

impl FirecrawlIngestor {
    /// Create a new Firecrawl ingestor with the given API key.
    pub fn new(api_key: impl Into<SecretString>) -> CrawlResult<Self> {
        let api_key = api_key.into();
        if api_key.is_blank() {
            return Err(CrawlError::Config("Firecrawl API key is empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| CrawlError::Http(Box::new(e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: FIRECRAWL_BASE_URL.to_string(),
            poll_timeout_secs: 300,
            poll_interval_secs: 5,
        })
    }

    /// Create from environment variable `FIRECRAWL_API_KEY`.
    pub fn from_env() -> CrawlResult<Self> {
        let api_key = std::env::var("FIRECRAWL_API_KEY")
            .map_err(|_| CrawlError::Config("FIRECRAWL_API_KEY not set".into()))?;
        Self::new(api_key)
    }

    /// Set a custom API base URL (self-hosted Firecrawl, proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the poll timeout (seconds).
    pub fn with_poll_timeout(mut self, secs: u64) -> Self {
        self.poll_timeout_secs = secs;
        self
    }

    /// Set the poll interval (seconds, at least 1).
    pub fn with_poll_interval(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs.max(1);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1{}", self.base_url, path)
    }

    /// Check whether the API key is accepted.
    ///
    /// Any failure (network, non-2xx) counts as "not valid".
    pub async fn verify_api_key(&self) -> bool {
        let result = self
            .client
            .get(self.endpoint("/status"))
            .header(header::AUTHORIZATION, self.api_key.bearer())
            .send()
            .await;

        match result {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Firecrawl key check failed");
                false
            }
        }
    }

    async fn check(response: reqwest::Response) -> CrawlResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let err = CrawlError::from_status(status.as_u16(), &text);
        tracing::warn!(status = %status, error = %err, "Firecrawl API error");
        Err(err)
    }

    async fn post<T: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &T,
    ) -> CrawlResult<R> {
        let response = self
            .client
            .post(self.endpoint(path))
            .header(header::AUTHORIZATION, self.api_key.bearer())
            .json(body)
            .send()
            .await
            .map_err(|e| CrawlError::Http(Box::new(e)))?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| CrawlError::Http(Box::new(e)))
    }

    async fn get<R: for<'de> Deserialize<'de>>(&self, path: &str) -> CrawlResult<R> {
        let response = self
            .client
            .get(self.endpoint(path))
            .header(header::AUTHORIZATION, self.api_key.bearer())
            .send()
            .await
            .map_err(|e| CrawlError::Http(Box::new(e)))?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| CrawlError::Http(Box::new(e)))
    }

    /// Scrape a single URL.
    async fn scrape_single(&self, url: &str) -> CrawlResult<Page> {
        let request = ScrapeRequest {
            url,
            formats: vec!["markdown"],
        };

        let response: ScrapeResponse = self.post("/scrape", &request).await?;
        if !response.success {
            return Err(CrawlError::CrawlFailed {
                reason: format!("scrape of {} was not successful", url),
            });
        }

        let data = response.data.ok_or_else(|| CrawlError::CrawlFailed {
            reason: "no data returned".into(),
        })?;

        // single scrapes keep the requested URL when metadata lacks one
        let mut page = page_from_data(data).ok_or_else(|| CrawlError::CrawlFailed {
            reason: format!("no markdown content for {}", url),
        })?;
        if page.url.is_none() {
            page.url = Some(url.to_string());
        }
        Ok(page)
    }
}

/// Convert Firecrawl document data to a page; `None` without content.
fn page_from_data(data: CrawlPageData) -> Option<Page> {
    let markdown = data.markdown?;
    if markdown.trim().is_empty() {
        return None;
    }

    let url = data
        .metadata
        .and_then(|m| m.source_url)
        .filter(|u| !u.is_empty());

    Some(Page {
        text: Some(markdown),
        url,
    })
}

#[async_trait]
impl Ingestor for FirecrawlIngestor {
    async fn discover(&self, config: &DiscoverConfig) -> CrawlResult<Vec<Page>> {
        config.validate()?;

        tracing::info!(
            url = %config.url,
            limit = %config.limit,
            max_depth = %config.max_depth,
            "Starting Firecrawl discover"
        );

        let request = CrawlRequest {
            url: &config.url,
            limit: config.limit,
            max_depth: config.max_depth,
            scrape_options: CrawlScrapeOptions {
                formats: vec!["markdown"],
                only_main_content: true,
            },
            include_paths: config.include_patterns.clone(),
            exclude_paths: config.exclude_patterns.clone(),
        };

        let start: CrawlStartResponse = self.post("/crawl", &request).await?;
        if !start.success {
            return Err(CrawlError::CrawlFailed {
                reason: "crawl could not be started".into(),
            });
        }
        let crawl_id = start.id.ok_or_else(|| CrawlError::CrawlFailed {
            reason: "no crawl ID returned".into(),
        })?;

        tracing::info!(crawl_id = %crawl_id, "Crawl started, polling for results");

        let max_attempts = (self.poll_timeout_secs / self.poll_interval_secs).max(1);
        let mut attempts = 0;

        loop {
            attempts += 1;
            if attempts > max_attempts {
                return Err(CrawlError::Timeout {
                    url: config.url.clone(),
                });
            }

            tokio::time::sleep(Duration::from_secs(self.poll_interval_secs)).await;

            let status: CrawlStatusResponse = self.get(&format!("/crawl/{}", crawl_id)).await?;

            match status.status.as_str() {
                "completed" => {
                    let pages: Vec<Page> = status
                        .data
                        .into_iter()
                        .filter_map(page_from_data)
                        .collect();

                    tracing::info!(
                        url = %config.url,
                        pages_discovered = pages.len(),
                        "Firecrawl discover completed"
                    );
                    return Ok(pages);
                }
                "failed" | "cancelled" => {
                    return Err(CrawlError::CrawlFailed {
                        reason: format!("crawl {} ended with status {}", crawl_id, status.status),
                    });
                }
                _ => {
                    tracing::debug!(
                        crawl_id = %crawl_id,
                        status = %status.status,
                        completed = ?status.completed,
                        total = ?status.total,
                        "Crawl in progress"
                    );
                }
            }
        }
    }

    async fn fetch_specific(&self, urls: &[String]) -> CrawlResult<Vec<Page>> {
        let mut pages = Vec::with_capacity(urls.len());

        for url in urls {
            match self.scrape_single(url).await {
                Ok(page) => pages.push(page),
                Err(e) => {
                    tracing::warn!("Failed to scrape {}: {}", url, e);
                }
            }
        }

        Ok(pages)
    }

    fn name(&self) -> &str {
        "firecrawl"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ingestor() {
        let ingestor = FirecrawlIngestor::new("fc-test").unwrap();
        assert_eq!(ingestor.name(), "firecrawl");
        assert_eq!(ingestor.base_url(), FIRECRAWL_BASE_URL);
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            FirecrawlIngestor::new("   "),
            Err(CrawlError::Config(_))
        ));
    }

    #[test]
    fn test_endpoint_building() {
        let ingestor = FirecrawlIngestor::new("fc-test")
            .unwrap()
            .with_base_url("http://localhost:3002/");
        assert_eq!(ingestor.endpoint("/crawl"), "http://localhost:3002/v1/crawl");
    }

    #[test]
    fn test_page_from_data() {
        let data: CrawlPageData = serde_json::from_str(
            r##"{"markdown":"# Impact\n\nSolar everywhere","metadata":{"sourceURL":"https://example.com/impact","title":"Impact"}}"##,
        )
        .unwrap();

        let page = page_from_data(data).unwrap();
        assert_eq!(page.url.as_deref(), Some("https://example.com/impact"));
        assert!(page.text.unwrap().contains("Solar everywhere"));
    }

    #[test]
    fn test_page_from_data_empty_content() {
        let data = CrawlPageData {
            markdown: Some("   ".to_string()),
            metadata: None,
        };
        assert!(page_from_data(data).is_none());
    }

    #[test]
    fn test_page_from_data_without_url_keeps_text() {
        let data = CrawlPageData {
            markdown: Some("Content".to_string()),
            metadata: None,
        };
        let page = page_from_data(data).unwrap();
        assert_eq!(page.url, None);
        assert_eq!(page.text.as_deref(), Some("Content"));
    }

    #[test]
    fn test_crawl_request_shape() {
        let config = DiscoverConfig::new("https://example.com").exclude("/jobs/*");
        let request = CrawlRequest {
            url: &config.url,
            limit: config.limit,
            max_depth: config.max_depth,
            scrape_options: CrawlScrapeOptions {
                formats: vec!["markdown"],
                only_main_content: true,
            },
            include_paths: config.include_patterns.clone(),
            exclude_paths: config.exclude_patterns.clone(),
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["limit"], 10);
        assert_eq!(json["maxDepth"], 2);
        assert_eq!(json["scrapeOptions"]["onlyMainContent"], true);
        assert!(json.get("includePaths").is_none());
        assert_eq!(json["excludePaths"][0], "/jobs/*");
    }

    #[tokio::test]
    async fn test_discover_rejects_invalid_url() {
        let ingestor = FirecrawlIngestor::new("fc-test").unwrap();
        let result = ingestor.discover(&DiscoverConfig::new("not a url")).await;
        assert!(matches!(result, Err(CrawlError::InvalidUrl { .. })));
    }
}
