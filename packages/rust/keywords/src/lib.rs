//! Keyword extraction and resume/job match scoring.
//!
//! Text is case-folded, stripped down to `[a-z0-9-]` words, filtered against a
//! fixed stopword set and ranked by raw frequency. Equal frequencies keep the
//! order in which each keyword first appeared in the text.

mod scoring;
mod stopwords;

use std::collections::HashMap;

use tracing::{debug, instrument};

use jobmatch_shared::{ExtractConfig, KeywordCount, KeywordList};

pub use scoring::score_match;
pub use stopwords::is_stopword;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Options for keyword extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Shortest token (in characters) kept as a keyword.
    pub min_length: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { min_length: 2 }
    }
}

impl From<&ExtractConfig> for ExtractOptions {
    fn from(config: &ExtractConfig) -> Self {
        Self {
            min_length: config.min_length,
        }
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// Split text into normalized word tokens.
///
/// Lowercases, maps curly quotes to `'`, turns every character other than
/// `a-z`, `0-9`, `-` and whitespace into a separator, then splits on whitespace.
/// Hyphens are kept, so "state-of-the-art" stays a single token.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(fold_quote)
        .map(|c| if is_token_char(c) || c.is_whitespace() { c } else { ' ' })
        .collect();

    normalized.split_whitespace().map(str::to_owned).collect()
}

fn fold_quote(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' => '\'',
        other => other,
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Count surviving tokens and rank them by descending frequency.
///
/// The sort is stable over first-seen order, so ties resolve to whichever
/// keyword appeared earlier in `text`.
pub fn keyword_counts(text: &str, opts: &ExtractOptions) -> Vec<KeywordCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<KeywordCount> = Vec::new();

    for token in tokenize(text) {
        if is_stopword(&token) || token.chars().count() < opts.min_length {
            continue;
        }
        match index.get(&token) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(token.clone(), counts.len());
                counts.push(KeywordCount {
                    keyword: token,
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Extract the ranked keyword list from free text.
///
/// Empty or whitespace-only input yields an empty list.
#[instrument(skip(text), fields(text_len = text.len(), min_length = opts.min_length))]
pub fn extract_keywords(text: &str, opts: &ExtractOptions) -> KeywordList {
    let ranked: Vec<String> = keyword_counts(text, opts)
        .into_iter()
        .map(|kc| kc.keyword)
        .collect();

    debug!(keywords = ranked.len(), "keywords extracted");
    KeywordList::new(ranked)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn extract(text: &str) -> Vec<String> {
        extract_keywords(text, &ExtractOptions::default()).into_vec()
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(extract("").is_empty());
        assert!(extract("   \n\t  ").is_empty());
    }

    #[test]
    fn pure_stopwords_yield_nothing() {
        assert!(extract("The the AND and").is_empty());
    }

    #[test]
    fn ranks_by_frequency_and_folds_case() {
        assert_eq!(extract("Python python PYTHON java"), vec!["python", "java"]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        assert_eq!(
            extract("kafka redis docker redis kafka docker"),
            vec!["kafka", "redis", "docker"]
        );
    }

    #[test]
    fn hyphenated_words_stay_whole() {
        let keywords = extract("State-of-the-art tooling");
        assert_eq!(keywords, vec!["state-of-the-art", "tooling"]);
    }

    #[test]
    fn punctuation_separates_tokens() {
        assert_eq!(tokenize("C++, Node.js/TypeScript!"), vec!["c", "node", "js", "typescript"]);
    }

    #[test]
    fn curly_and_straight_apostrophes_tokenize_alike() {
        assert_eq!(tokenize("team\u{2019}s"), tokenize("team's"));
        assert_eq!(tokenize("team's"), vec!["team", "s"]);
    }

    #[test]
    fn short_tokens_are_dropped() {
        assert_eq!(extract("a b c go r"), vec!["go"]);
        let opts = ExtractOptions { min_length: 3 };
        assert!(extract_keywords("go ml ai", &opts).is_empty());
    }

    #[test]
    fn non_ascii_letters_act_as_separators() {
        assert_eq!(tokenize("café résumé"), vec!["caf", "r", "sum"]);
    }

    #[test]
    fn counts_are_reported() {
        let counts = keyword_counts("rust Rust go", &ExtractOptions::default());
        assert_eq!(
            counts,
            vec![
                KeywordCount { keyword: "rust".into(), count: 2 },
                KeywordCount { keyword: "go".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn options_follow_config() {
        let opts = ExtractOptions::from(&ExtractConfig { min_length: 4 });
        assert_eq!(opts.min_length, 4);
    }

    proptest! {
        #[test]
        fn output_has_no_stopwords_or_short_tokens(text in ".{0,200}", min_length in 1usize..5) {
            let opts = ExtractOptions { min_length };
            for keyword in extract_keywords(&text, &opts).iter() {
                prop_assert!(!is_stopword(keyword));
                prop_assert!(keyword.chars().count() >= min_length);
                prop_assert!(keyword.chars().all(is_token_char));
            }
        }

        #[test]
        fn extraction_is_deterministic(text in "[A-Za-z ,.'-]{0,200}") {
            let opts = ExtractOptions::default();
            prop_assert_eq!(extract_keywords(&text, &opts), extract_keywords(&text, &opts));
        }

        #[test]
        fn output_is_unique(text in "[a-e ]{0,120}") {
            let keywords = extract_keywords(&text, &ExtractOptions::default());
            let set = keywords.to_set();
            prop_assert_eq!(set.len(), keywords.len());
        }
    }
}
