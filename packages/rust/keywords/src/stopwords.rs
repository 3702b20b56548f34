//! Fixed set of function words that never become keywords.

use std::collections::HashSet;
use std::sync::LazyLock;

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "a", "an", "and", "or", "of", "in", "for", "to", "with", "on", "is", "are", "as",
        "by", "from", "that", "this", "be", "you", "your", "we", "i", "it", "at", "will", "can",
        "have", "has", "but", "if", "which", "their", "they", "them", "our",
    ]
    .into_iter()
    .collect()
});

/// Whether `token` (already lowercased) is a stopword.
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}
