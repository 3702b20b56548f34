//! Whole-word, case-insensitive keyword alternation.

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

/// Keywords longer than this many characters are never matched.
const MAX_KEYWORD_CHARS: usize = 256;

/// Build `\b(?:k1|k2|...)\b` over the escaped keywords.
///
/// Overlong keywords are dropped up front. If the combined pattern does not
/// compile, keywords that fail on their own are dropped and the longest
/// leading run that still compiles is kept. Returns `None` only when no
/// keyword survives.
pub(crate) fn build_pattern(keywords: &[&str]) -> Option<Regex> {
    let keywords: Vec<&str> = keywords
        .iter()
        .copied()
        .filter(|k| {
            let fits = k.chars().count() <= MAX_KEYWORD_CHARS;
            if !fits {
                warn!(chars = k.chars().count(), "dropping overlong keyword");
            }
            fits
        })
        .collect();
    if keywords.is_empty() {
        return None;
    }

    let error = match compile(&keywords) {
        Ok(regex) => return Some(regex),
        Err(e) => e,
    };
    warn!(error = %error, "combined keyword pattern failed, retrying per keyword");

    let usable: Vec<&str> = keywords
        .into_iter()
        .filter(|k| match compile(&[*k]) {
            Ok(_) => true,
            Err(e) => {
                warn!(keyword = %k, error = %e, "dropping keyword");
                false
            }
        })
        .collect();
    longest_compiling_prefix(&usable)
}

/// Bisect for the longest prefix of `keywords` whose alternation compiles.
fn longest_compiling_prefix(keywords: &[&str]) -> Option<Regex> {
    let mut best = None;
    let (mut lo, mut hi) = (1, keywords.len());
    while lo <= hi {
        let mid = lo + (hi - lo) / 2;
        match compile(&keywords[..mid]) {
            Ok(regex) => {
                best = Some(regex);
                lo = mid + 1;
            }
            Err(_) => hi = mid - 1,
        }
    }
    if best.is_some() {
        debug!(kept = lo - 1, of = keywords.len(), "keyword pattern trimmed to fit");
    }
    best
}

fn compile(keywords: &[&str]) -> Result<Regex, regex::Error> {
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
        .case_insensitive(true)
        .build()
}
