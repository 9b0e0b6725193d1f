//! Ingestor implementations.
//!
//! - `FirecrawlIngestor` - Firecrawl API (requires `firecrawl` feature)
//! - `MockIngestor` - For testing

mod mock;

#[cfg(feature = "firecrawl")]
mod firecrawl;

pub use mock::MockIngestor;

#[cfg(feature = "firecrawl")]
pub use firecrawl::{FirecrawlIngestor, FIRECRAWL_BASE_URL};

// Re-export from traits for convenience
pub use crate::traits::ingestor::{DiscoverConfig, Ingestor};
