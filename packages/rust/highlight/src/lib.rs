//! In-page keyword highlighting.
//!
//! Marks every whole-word, case-insensitive keyword occurrence in a document's
//! rendered text. The pass runs in two phases: all candidate text nodes are
//! collected first, then each matching node is swapped for a `<span>` whose
//! children interleave the untouched text with one `<mark>` per match. The tree
//! is never mutated while it is being walked.

mod dom;
mod pattern;

use regex::Regex;
use tracing::{debug, instrument, warn};

use jobmatch_shared::{HighlightConfig, HighlightResult};

pub use dom::{Document, ElementData, NodeData, NodeId};

/// Attribute carried by every `<mark>` this crate inserts.
pub const MARKER_ATTR: &str = "data-jobmatch";

/// Parent elements whose text is never highlighted.
const SKIPPED_PARENTS: &[&str] = &["script", "style", "noscript", "textarea", "input"];

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Options for a highlight pass.
#[derive(Debug, Clone)]
pub struct HighlightOptions {
    /// Keywords beyond this many are ignored.
    pub max_keywords: usize,
    /// Inline CSS for each `<mark>`.
    pub mark_style: String,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self::from(&HighlightConfig::default())
    }
}

impl From<&HighlightConfig> for HighlightOptions {
    fn from(config: &HighlightConfig) -> Self {
        Self {
            max_keywords: config.max_keywords,
            mark_style: config.mark_style.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Highlight every occurrence of `keywords` inside the document body.
///
/// Blank keywords are ignored and the rest are capped at
/// `opts.max_keywords`. Returns how many text nodes were rewritten; failures
/// (no usable keywords, no body) come back as `ok: false` with a reason.
#[instrument(skip_all, fields(keywords = keywords.len(), max_keywords = opts.max_keywords))]
pub fn highlight(doc: &mut Document, keywords: &[String], opts: &HighlightOptions) -> HighlightResult {
    let usable: Vec<&str> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .take(opts.max_keywords)
        .collect();

    if usable.is_empty() {
        return HighlightResult::failed(HighlightResult::NO_KEYWORDS);
    }

    let Some(pattern) = pattern::build_pattern(&usable) else {
        return HighlightResult::failed(HighlightResult::NO_KEYWORDS);
    };

    let Some(body) = doc.body() else {
        warn!("document has no body, nothing to highlight");
        return HighlightResult::failed(HighlightResult::DOCUMENT_UNAVAILABLE);
    };

    let candidates = collect_candidates(doc, body);
    debug!(candidates = candidates.len(), "text nodes collected");

    let replaced = apply_highlights(doc, &candidates, &pattern, &opts.mark_style);
    debug!(replaced, "highlight pass complete");

    HighlightResult::replaced(replaced)
}

// ---------------------------------------------------------------------------
// Phase 1: collect
// ---------------------------------------------------------------------------

/// Text nodes under `root` that carry visible, non-blank text.
fn collect_candidates(doc: &Document, root: NodeId) -> Vec<NodeId> {
    doc.descendants(root)
        .into_iter()
        .filter(|&id| is_candidate(doc, id))
        .collect()
}

fn is_candidate(doc: &Document, id: NodeId) -> bool {
    let Some(text) = doc.text(id) else {
        return false;
    };
    if text.trim().is_empty() {
        return false;
    }
    let Some(parent) = doc.parent(id).and_then(|p| doc.element(p)) else {
        return false;
    };
    if SKIPPED_PARENTS.contains(&parent.name.as_str()) {
        return false;
    }
    // Already wrapped by an earlier pass.
    !(parent.name == "mark" && parent.attr(MARKER_ATTR).is_some())
}

// ---------------------------------------------------------------------------
// Phase 2: mutate
// ---------------------------------------------------------------------------

/// Rewrite each matching candidate; returns the number of nodes replaced.
fn apply_highlights(doc: &mut Document, candidates: &[NodeId], pattern: &Regex, style: &str) -> usize {
    let mut replaced = 0;

    for &id in candidates {
        let Some(text) = doc.text(id).map(str::to_owned) else {
            continue;
        };
        if !pattern.is_match(&text) {
            continue;
        }
        if !doc.is_attached(id) {
            warn!(?id, "text node detached since collection, skipping");
            continue;
        }

        let wrapper = build_wrapper(doc, &text, pattern, style);
        if doc.replace_node(id, wrapper) {
            replaced += 1;
        }
    }

    replaced
}

/// Build a detached `<span>` holding `text` with each match inside a `<mark>`.
fn build_wrapper(doc: &mut Document, text: &str, pattern: &Regex, style: &str) -> NodeId {
    let wrapper = doc.create_element("span", Vec::new());
    let mut cursor = 0;

    for found in pattern.find_iter(text) {
        if found.start() > cursor {
            let before = doc.create_text(&text[cursor..found.start()]);
            doc.append_child(wrapper, before);
        }
        let mark = doc.create_element(
            "mark",
            vec![
                (MARKER_ATTR.to_owned(), String::new()),
                ("style".to_owned(), style.to_owned()),
            ],
        );
        let inner = doc.create_text(found.as_str());
        doc.append_child(mark, inner);
        doc.append_child(wrapper, mark);
        cursor = found.end();
    }

    if cursor < text.len() {
        let rest = doc.create_text(&text[cursor..]);
        doc.append_child(wrapper, rest);
    }

    wrapper
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
