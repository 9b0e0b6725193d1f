//! Page types - crawled documents as handed over by a content source.

use serde::{Deserialize, Serialize};

/// One crawled document.
///
/// Both fields are optional because content sources return loosely shaped
/// payloads. A page without text contributes nothing to extraction; a page
/// without a URL is attributed to the caller-supplied fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Extracted body text (usually markdown)
    #[serde(default)]
    pub text: Option<String>,

    /// Source location of the page
    #[serde(default)]
    pub url: Option<String>,
}

impl Page {
    /// Create a page with both text and URL.
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            url: Some(url.into()),
        }
    }

    /// Create a page with text but no URL of its own.
    pub fn untitled(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            url: None,
        }
    }

    /// Non-empty body text, if any.
    pub fn body(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// The page URL, or `fallback` when the page has none.
    pub fn url_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => fallback,
        }
    }

    /// Check if this page has content.
    pub fn has_content(&self) -> bool {
        self.body().is_some()
    }
}

/// Crawl payload as returned by a content source: `{ "data": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlData {
    #[serde(default)]
    pub data: Option<Vec<Page>>,
}

impl CrawlData {
    /// Wrap a list of pages.
    pub fn from_pages(pages: Vec<Page>) -> Self {
        Self { data: Some(pages) }
    }

    /// Pages in the payload (empty when `data` is absent).
    pub fn pages(&self) -> &[Page] {
        self.data.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_fallback() {
        let page = Page::untitled("Solar power is green.");
        assert_eq!(page.url_or("https://x.com"), "https://x.com");

        let page = Page::new("https://a.com/about", "text");
        assert_eq!(page.url_or("https://x.com"), "https://a.com/about");
    }

    #[test]
    fn test_empty_url_uses_fallback() {
        let page = Page {
            text: Some("text".into()),
            url: Some(String::new()),
        };
        assert_eq!(page.url_or("https://x.com"), "https://x.com");
    }

    #[test]
    fn test_empty_text_has_no_body() {
        assert!(!Page::default().has_content());
        assert!(!Page::untitled("").has_content());
        assert!(Page::untitled("x").has_content());
    }

    #[test]
    fn test_deserialize_loose_payload() {
        let json = r#"{"data":[{"text":"hello"},{"url":"https://a.com"},{}]}"#;
        let crawl: CrawlData = serde_json::from_str(json).unwrap();
        assert_eq!(crawl.pages().len(), 3);
        assert_eq!(crawl.pages()[0].text.as_deref(), Some("hello"));
        assert_eq!(crawl.pages()[1].url.as_deref(), Some("https://a.com"));

        let empty: CrawlData = serde_json::from_str("{}").unwrap();
        assert!(empty.pages().is_empty());
    }
}
