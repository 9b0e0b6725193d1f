//! Extraction pipeline - paragraph splitting, keyword scoring and ranking.

pub mod extract;
pub mod score;

pub use extract::{extract_from_crawl, extract_initiatives, ExtractorConfig, InitiativeExtractor};
pub use score::{KeywordScorer, GREEN_KEYWORDS};
