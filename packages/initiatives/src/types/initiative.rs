//! Ranked initiative records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of characters kept by [`Initiative::headline`].
pub const HEADLINE_CHARS: usize = 150;

/// A scored, source-attributed paragraph.
///
/// `text` is the paragraph verbatim. Initiatives produced by the extractor
/// always have `score >= 1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Initiative {
    pub text: String,
    pub url: String,
    pub score: u32,
}

impl Initiative {
    pub fn new(text: impl Into<String>, url: impl Into<String>, score: u32) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
            score,
        }
    }

    /// First [`HEADLINE_CHARS`] characters of the text, with `...` appended
    /// when anything was cut.
    pub fn headline(&self) -> String {
        let mut chars = self.text.chars();
        let head: String = chars.by_ref().take(HEADLINE_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }

    /// Host part of the source URL, when it parses.
    pub fn source_host(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }

    /// Turn this initiative into a finding record dated `date`.
    pub fn to_finding(&self, date: NaiveDate) -> InitiativeFinding {
        InitiativeFinding {
            project: self.headline(),
            source: self.url.clone(),
            date,
            description: self.text.clone(),
        }
    }
}

/// An initiative picked for follow-up analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeFinding {
    /// Short title (the initiative headline)
    pub project: String,
    /// Source URL
    pub source: String,
    /// Date the finding was recorded
    pub date: NaiveDate,
    /// Full paragraph
    pub description: String,
}

/// The `n` highest ranked initiatives of an already sorted list.
pub fn top_initiatives(initiatives: &[Initiative], n: usize) -> &[Initiative] {
    &initiatives[..initiatives.len().min(n)]
}
