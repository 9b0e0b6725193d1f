//! Green Initiative Discovery
//!
//! Finds paragraphs describing sustainability work on company websites and
//! ranks them by a simple, explainable keyword score.
//!
//! # Usage
//!
//! ```rust
//! use initiatives::{extract_initiatives, Page};
//!
//! let pages = vec![
//!     Page::new("https://example.com/impact", "Our solar and wind farms cut carbon.\n\nContact us."),
//!     Page::untitled("Recycling and conservation programs across all sites."),
//! ];
//!
//! let ranked = extract_initiatives(&pages, "https://example.com");
//! assert_eq!(ranked.len(), 2);
//! assert_eq!(ranked[0].score, 3);
//! assert_eq!(ranked[1].url, "https://example.com");
//! ```
//!
//! # Modules
//!
//! - [`types`] - Page and initiative records
//! - [`pipeline`] - Paragraph splitting, keyword scoring, ranking
//! - [`traits`] - Content source abstraction
//! - [`ingestors`] - Firecrawl and mock content sources
//! - [`security`] - API key wrapper

pub mod error;
pub mod ingestors;
pub mod pipeline;
pub mod security;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{CrawlError, CrawlResult};
pub use pipeline::{
    extract_from_crawl, extract_initiatives, ExtractorConfig, InitiativeExtractor, KeywordScorer,
    GREEN_KEYWORDS,
};
pub use security::SecretString;
pub use traits::ingestor::{DiscoverConfig, Ingestor};
pub use types::{
    initiative::{top_initiatives, Initiative, InitiativeFinding},
    page::{CrawlData, Page},
};

pub use ingestors::MockIngestor;

#[cfg(feature = "firecrawl")]
pub use ingestors::FirecrawlIngestor;
