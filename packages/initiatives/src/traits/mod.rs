//! Trait abstractions implemented by content sources.

pub mod ingestor;
