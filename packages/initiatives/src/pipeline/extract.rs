//! Initiative extraction - split pages into paragraphs, score, rank.

use std::sync::OnceLock;

use crate::pipeline::score::{KeywordScorer, GREEN_KEYWORDS};
use crate::types::initiative::Initiative;
use crate::types::page::{CrawlData, Page};

/// Configuration for [`InitiativeExtractor`].
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Paragraphs shorter than this (in UTF-16 code units, untrimmed) are skipped
    pub min_paragraph_len: usize,

    /// Separator between paragraphs
    pub paragraph_delimiter: String,

    /// Scoring vocabulary
    pub keywords: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_paragraph_len: 20,
            paragraph_delimiter: "\n\n".to_string(),
            keywords: GREEN_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl ExtractorConfig {
    /// Set the minimum paragraph length.
    pub fn with_min_paragraph_len(mut self, len: usize) -> Self {
        self.min_paragraph_len = len;
        self
    }

    /// Set the paragraph delimiter.
    pub fn with_paragraph_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.paragraph_delimiter = delimiter.into();
        self
    }

    /// Replace the scoring vocabulary.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

/// Ranks paragraphs of crawled pages by keyword relevance.
///
/// Extraction never fails: pages without text, short paragraphs and
/// paragraphs without any keyword simply produce nothing.
#[derive(Debug, Clone)]
pub struct InitiativeExtractor {
    config: ExtractorConfig,
    scorer: KeywordScorer,
}

impl Default for InitiativeExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl InitiativeExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        let scorer = KeywordScorer::new(&config.keywords);
        Self { config, scorer }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Relevance score of a single paragraph.
    pub fn score(&self, paragraph: &str) -> u32 {
        self.scorer.score(paragraph)
    }

    /// Extract and rank initiatives, highest score first.
    ///
    /// Ties keep the order in which paragraphs appear across `pages`.
    pub fn extract(&self, pages: &[Page], fallback_url: &str) -> Vec<Initiative> {
        let mut initiatives = Vec::new();

        for page in pages {
            let Some(text) = page.body() else {
                continue;
            };
            let url = page.url_or(fallback_url);

            for paragraph in self.paragraphs(text) {
                let score = self.scorer.score(paragraph);
                if score > 0 {
                    initiatives.push(Initiative::new(paragraph, url, score));
                }
            }
        }

        // stable: equal scores stay in input order
        initiatives.sort_by(|a, b| b.score.cmp(&a.score));

        tracing::debug!(
            pages = pages.len(),
            initiatives = initiatives.len(),
            "Extracted green initiatives"
        );

        initiatives
    }

    /// Extract from a loosely shaped crawl payload.
    pub fn extract_crawl(&self, crawl: Option<&CrawlData>, fallback_url: &str) -> Vec<Initiative> {
        match crawl {
            Some(crawl) => self.extract(crawl.pages(), fallback_url),
            None => Vec::new(),
        }
    }

    fn paragraphs<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let min = self.config.min_paragraph_len;
        let split: Box<dyn Iterator<Item = &'a str> + 'a> =
            if self.config.paragraph_delimiter.is_empty() {
                Box::new(std::iter::once(text))
            } else {
                Box::new(text.split(self.config.paragraph_delimiter.as_str()))
            };
        split.filter(move |p| p.encode_utf16().count() >= min)
    }
}

fn default_extractor() -> &'static InitiativeExtractor {
    static EXTRACTOR: OnceLock<InitiativeExtractor> = OnceLock::new();
    EXTRACTOR.get_or_init(InitiativeExtractor::default)
}

/// Extract and rank initiatives with the default configuration.
pub fn extract_initiatives(pages: &[Page], fallback_url: &str) -> Vec<Initiative> {
    default_extractor().extract(pages, fallback_url)
}

/// Extract from an optional crawl payload with the default configuration.
pub fn extract_from_crawl(crawl: Option<&CrawlData>, fallback_url: &str) -> Vec<Initiative> {
    default_extractor().extract_crawl(crawl, fallback_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(extract_initiatives(&[], "https://x.com").is_empty());
        assert!(extract_initiatives(&[Page::default()], "https://x.com").is_empty());
        assert!(extract_from_crawl(None, "https://x.com").is_empty());
        assert!(extract_from_crawl(Some(&CrawlData::default()), "https://x.com").is_empty());
    }

    #[test]
    fn test_url_fallback() {
        let pages = vec![Page::untitled("Solar power is green.")];
        let result = extract_initiatives(&pages, "https://x.com");

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].url, "https://x.com");
        assert_eq!(result[0].score, 2);
    }

    #[test]
    fn test_short_paragraph_excluded() {
        // 17 characters
        let pages = vec![Page::untitled("green green green")];
        assert!(extract_initiatives(&pages, "https://x.com").is_empty());
    }

    #[test]
    fn test_length_is_not_trimmed() {
        // 14 visible characters padded to 20 with spaces
        let pages = vec![Page::untitled("   green energy   ")];
        assert!(extract_initiatives(&pages, "https://x.com").is_empty());

        let pages = vec![Page::untitled("     green energy     ")];
        let result = extract_initiatives(&pages, "https://x.com");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "     green energy     ");
    }

    #[test]
    fn test_length_counts_utf16_units() {
        // 18 chars, 21 UTF-16 units
        let para = "green \u{1F331}\u{1F331}\u{1F331} energy!!";
        assert_eq!(para.chars().count(), 18);

        let result = extract_initiatives(&[Page::untitled(para)], "https://x.com");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].score, 1);
    }

    #[test]
    fn test_zero_score_dropped() {
        let pages = vec![Page::new(
            "https://a.com",
            "This paragraph talks about quarterly revenue.\n\nOur solar farms keep growing.",
        )];
        let result = extract_initiatives(&pages, "https://x.com");

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "Our solar farms keep growing.");
        assert_eq!(result[0].url, "https://a.com");
    }

    #[test]
    fn test_sorted_descending_and_stable() {
        let pages = vec![
            Page::new("https://a.com/1", "First paragraph on solar power.\n\nGreen, green, green and renewable."),
            Page::new("https://a.com/2", "Second mention of wind turbines."),
        ];
        let result = extract_initiatives(&pages, "https://x.com");

        let scores: Vec<u32> = result.iter().map(|i| i.score).collect();
        assert_eq!(scores, vec![4, 2, 1]);
        // "Second" scores eco + wind
        assert_eq!(result[1].url, "https://a.com/2");
        assert_eq!(result[2].text, "First paragraph on solar power.");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let pages = vec![
            Page::new("https://a.com/1", "A paragraph about solar roofs."),
            Page::new("https://a.com/2", "A paragraph about carbon taxes."),
            Page::new("https://a.com/3", "A paragraph about climate risk."),
        ];
        let result = extract_initiatives(&pages, "https://x.com");

        let urls: Vec<&str> = result.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.com/1", "https://a.com/2", "https://a.com/3"]);
    }

    #[test]
    fn test_paragraph_text_verbatim() {
        let para = "  Our ESG program:\n- recycling\n- solar  ";
        let pages = vec![Page::untitled(para)];
        let result = extract_initiatives(&pages, "https://x.com");
        assert_eq!(result[0].text, para);
    }

    #[test]
    fn test_custom_config() {
        let extractor = InitiativeExtractor::new(
            ExtractorConfig::default()
                .with_min_paragraph_len(5)
                .with_paragraph_delimiter("\n")
                .with_keywords(["tidal"]),
        );
        let pages = vec![Page::untitled("Tidal\nnothing here\ntidal tidal")];
        let result = extractor.extract(&pages, "https://x.com");

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].text, "tidal tidal");
        assert_eq!(result[0].score, 2);
        assert_eq!(result[1].text, "Tidal");
    }

    #[test]
    fn test_extract_crawl_payload() {
        let crawl: CrawlData = serde_json::from_str(
            r#"{"data":[{"text":"We are committed to net-zero emissions.","url":"https://a.com/esg"},{"url":"https://a.com/empty"}]}"#,
        )
        .unwrap();
        let result = extract_from_crawl(Some(&crawl), "https://x.com");

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].url, "https://a.com/esg");
    }
}
