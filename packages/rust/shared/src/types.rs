//! Core domain types shared by the extractor, the highlighter and the CLI.

use std::collections::HashSet;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// KeywordList
// ---------------------------------------------------------------------------

/// Ordered, duplicate-free list of normalized keywords, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct KeywordList(Vec<String>);

impl KeywordList {
    /// Build a list from already-ranked keywords.
    ///
    /// Later duplicates are dropped so the first (highest-ranked) position wins.
    pub fn new(ranked: Vec<String>) -> Self {
        let mut seen = HashSet::with_capacity(ranked.len());
        let keywords = ranked
            .into_iter()
            .filter(|k| seen.insert(k.clone()))
            .collect();
        Self(keywords)
    }

    /// Set view used for membership checks during scoring.
    pub fn to_set(&self) -> HashSet<&str> {
        self.0.iter().map(String::as_str).collect()
    }

    /// Consume the list and return the underlying keywords.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for KeywordList {
    fn from(ranked: Vec<String>) -> Self {
        Self::new(ranked)
    }
}

impl Deref for KeywordList {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a KeywordList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A keyword together with the number of times it occurred in its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// MatchReport
// ---------------------------------------------------------------------------

/// Comparison of job keywords against resume keywords.
///
/// `matched` and `missing` keep the job list's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Percentage of job keywords present in the resume (0–100).
    pub score: u8,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

// ---------------------------------------------------------------------------
// HighlightResult
// ---------------------------------------------------------------------------

/// Outcome of a highlight pass over a document.
///
/// Reports how many text segments were rewritten, never which ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightResult {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaced_count: Option<usize>,
}

impl HighlightResult {
    /// Reason reported when no usable keyword was supplied.
    pub const NO_KEYWORDS: &'static str = "no keywords";
    /// Reason reported when the document has no body to walk.
    pub const DOCUMENT_UNAVAILABLE: &'static str = "document unavailable";

    /// A successful pass that rewrote `count` text segments.
    pub fn replaced(count: usize) -> Self {
        Self {
            ok: true,
            reason: None,
            replaced_count: Some(count),
        }
    }

    /// A pass that did not run, with a short reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
            replaced_count: None,
        }
    }
}
