//! Mock ingestor for testing.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::error::{CrawlError, CrawlResult};
use crate::traits::ingestor::{DiscoverConfig, Ingestor};
use crate::types::page::Page;

/// Mock ingestor returning canned pages.
///
/// Pages are returned in insertion order. Calls are recorded so tests can
/// assert on what was requested.
///
/// ```rust
/// use initiatives::{MockIngestor, Page};
///
/// let mock = MockIngestor::new()
///     .with_page(Page::new("https://example.com", "Our solar program keeps growing."));
/// ```
#[derive(Default, Clone)]
pub struct MockIngestor {
    pages: Arc<RwLock<Vec<Page>>>,
    failure: Option<String>,
    discover_calls: Arc<RwLock<Vec<String>>>,
    fetch_calls: Arc<RwLock<Vec<Vec<String>>>>,
}

impl MockIngestor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page that will be returned by discover/fetch.
    pub fn add_page(&self, page: Page) {
        self.pages.write().unwrap().push(page);
    }

    /// Add a page (builder pattern).
    pub fn with_page(self, page: Page) -> Self {
        self.add_page(page);
        self
    }

    /// Add multiple pages (builder pattern).
    pub fn with_pages(self, pages: impl IntoIterator<Item = Page>) -> Self {
        for page in pages {
            self.add_page(page);
        }
        self
    }

    /// Make every call fail with an HTTP error carrying `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// URLs requested via discover.
    pub fn discover_calls(&self) -> Vec<String> {
        self.discover_calls.read().unwrap().clone()
    }

    /// URL lists requested via fetch_specific.
    pub fn fetch_calls(&self) -> Vec<Vec<String>> {
        self.fetch_calls.read().unwrap().clone()
    }

    fn check_failure(&self) -> CrawlResult<()> {
        match &self.failure {
            Some(message) => Err(CrawlError::Http(message.clone().into())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Ingestor for MockIngestor {
    async fn discover(&self, config: &DiscoverConfig) -> CrawlResult<Vec<Page>> {
        self.discover_calls
            .write()
            .unwrap()
            .push(config.url.clone());
        self.check_failure()?;

        // Pages from the same site, plus pages without a URL
        let site = url::Url::parse(&config.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string));

        let pages = self.pages.read().unwrap();
        let matching = pages
            .iter()
            .filter(|p| match (&site, p.url.as_deref()) {
                (Some(site), Some(url)) => url::Url::parse(url)
                    .ok()
                    .and_then(|u| u.host_str().map(|h| h == site))
                    .unwrap_or(false),
                _ => true,
            })
            .take(config.limit)
            .cloned()
            .collect();

        Ok(matching)
    }

    async fn fetch_specific(&self, urls: &[String]) -> CrawlResult<Vec<Page>> {
        self.fetch_calls.write().unwrap().push(urls.to_vec());
        self.check_failure()?;

        let pages = self.pages.read().unwrap();
        let found = urls
            .iter()
            .filter_map(|url| pages.iter().find(|p| p.url.as_deref() == Some(url)).cloned())
            .collect();

        Ok(found)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_discover_same_site() {
        let mock = MockIngestor::new().with_pages([
            Page::new("https://example.com/", "# Home"),
            Page::new("https://example.com/about", "# About"),
            Page::new("https://other.com/", "# Other"),
        ]);

        let pages = mock
            .discover(&DiscoverConfig::new("https://example.com"))
            .await
            .unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].url.as_deref(), Some("https://example.com/"));
        assert_eq!(mock.discover_calls(), vec!["https://example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_discover_limit() {
        let mock = MockIngestor::new();
        for i in 0..20 {
            mock.add_page(Page::new(format!("https://example.com/{i}"), format!("Page {i}")));
        }

        let config = DiscoverConfig::new("https://example.com").with_limit(5);
        assert_eq!(mock.discover(&config).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_mock_fetch_specific() {
        let mock = MockIngestor::new().with_pages([
            Page::new("https://example.com/a", "Page A"),
            Page::new("https://example.com/b", "Page B"),
        ]);

        let pages = mock
            .fetch_specific(&[
                "https://example.com/b".to_string(),
                "https://example.com/missing".to_string(),
            ])
            .await
            .unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text.as_deref(), Some("Page B"));

        let one = mock.fetch_one("https://example.com/a").await.unwrap();
        assert_eq!(one.text.as_deref(), Some("Page A"));
        assert!(mock.fetch_one("https://example.com/missing").await.is_err());
        assert_eq!(mock.fetch_calls().len(), 3);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockIngestor::new().failing("connection reset");
        let result = mock.discover(&DiscoverConfig::new("https://example.com")).await;
        assert!(matches!(result, Err(CrawlError::Http(_))));
    }
}
