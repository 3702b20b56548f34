//! Match scoring between resume keywords and job keywords.

use jobmatch_shared::{KeywordList, MatchReport};
use tracing::debug;

/// Compare job keywords against resume keywords.
///
/// The resume list is used as a set; `matched` and `missing` keep the job
/// list's order. Returns `None` when there are no job keywords, since a
/// percentage of nothing has no meaning.
pub fn score_match(resume: &KeywordList, job: &KeywordList) -> Option<MatchReport> {
    if job.is_empty() {
        return None;
    }

    let resume_set = resume.to_set();
    let (matched, missing): (Vec<String>, Vec<String>) = job
        .iter()
        .cloned()
        .partition(|keyword| resume_set.contains(keyword.as_str()));

    let score = round_percent(matched.len(), job.len());
    debug!(score, matched = matched.len(), missing = missing.len(), "match scored");

    Some(MatchReport {
        score,
        matched,
        missing,
    })
}

/// `round(100 * part / whole)` in integer arithmetic, halves rounding up.
fn round_percent(part: usize, whole: usize) -> u8 {
    let percent = (200 * part + whole) / (2 * whole);
    percent.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(words: &[&str]) -> KeywordList {
        KeywordList::new(words.iter().map(|w| w.to_string()).collect())
    }

    #[test]
    fn partial_match_scores_two_thirds() {
        let report = score_match(&list(&["java", "sql"]), &list(&["java", "sql", "python"])).unwrap();
        assert_eq!(report.score, 67);
        assert_eq!(report.matched, vec!["java", "sql"]);
        assert_eq!(report.missing, vec!["python"]);
    }

    #[test]
    fn empty_job_list_has_no_score() {
        assert!(score_match(&list(&["java"]), &list(&[])).is_none());
    }

    #[test]
    fn empty_resume_misses_everything() {
        let report = score_match(&list(&[]), &list(&["rust", "go"])).unwrap();
        assert_eq!(report.score, 0);
        assert!(report.matched.is_empty());
        assert_eq!(report.missing, vec!["rust", "go"]);
    }

    #[test]
    fn full_match_scores_hundred() {
        let report = score_match(&list(&["go", "rust", "sql"]), &list(&["rust", "go"])).unwrap();
        assert_eq!(report.score, 100);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn missing_keeps_job_order() {
        let report = score_match(&list(&["b"]), &list(&["d", "b", "a", "c"])).unwrap();
        assert_eq!(report.missing, vec!["d", "a", "c"]);
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(round_percent(1, 8), 13);
        assert_eq!(round_percent(1, 2), 50);
        assert_eq!(round_percent(1, 3), 33);
    }
}
