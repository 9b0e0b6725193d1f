//! Keyword relevance scoring.
//!
//! A paragraph's score is the total number of case-insensitive literal
//! occurrences of every vocabulary keyword. Matching is plain substring
//! matching with no word boundaries, so `greenhouse` counts towards `green`
//! and `second` counts towards `eco`.

use regex::{Regex, RegexBuilder};

/// Default sustainability vocabulary.
pub const GREEN_KEYWORDS: &[&str] = &[
    "green",
    "sustainable",
    "renewable",
    "eco",
    "environment",
    "carbon",
    "solar",
    "wind",
    "hydro",
    "clean energy",
    "climate",
    "biodiversity",
    "net-zero",
    "esg",
    "sustainability",
    "conservation",
    "recycling",
];

/// Compiled keyword matchers.
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    patterns: Vec<Regex>,
}

impl KeywordScorer {
    /// Compile a scorer for the given vocabulary.
    ///
    /// Empty keywords are ignored.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        let patterns = keywords
            .iter()
            .map(AsRef::as_ref)
            .filter(|k| !k.is_empty())
            .filter_map(|keyword| {
                match RegexBuilder::new(&regex::escape(keyword))
                    .case_insensitive(true)
                    // ASCII keywords fold ASCII only
                    .unicode(!keyword.is_ascii())
                    .build()
                {
                    Ok(re) => Some(re),
                    Err(e) => {
                        tracing::warn!(keyword, error = %e, "Skipping keyword that failed to compile");
                        None
                    }
                }
            })
            .collect();

        Self { patterns }
    }

    /// Number of keywords this scorer matches against.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Sum of non-overlapping occurrence counts across the vocabulary.
    pub fn score(&self, paragraph: &str) -> u32 {
        self.patterns
            .iter()
            .map(|re| re.find_iter(paragraph).count() as u32)
            .sum()
    }
}

impl Default for KeywordScorer {
    fn default() -> Self {
        Self::new(GREEN_KEYWORDS)
    }
}
