//! End-to-end check and highlight workflows over a resume and a job page.

use tracing::{info, instrument, warn};

use jobmatch_keywords::{ExtractOptions, extract_keywords, score_match};
use jobmatch_shared::{AppConfig, HighlightResult, MatchReport};

use crate::messages::{MAX_KEYWORDS_PER_REQUEST, Request, Response};
use crate::page::PageChannel;

/// Shown when the job page yields no keywords at all.
pub const NO_JOB_KEYWORDS_MESSAGE: &str =
    "No keywords found on this page. Try on a job listing page.";

/// Shown when every job keyword already appears in the resume.
pub const NOTHING_MISSING_MESSAGE: &str =
    "No missing keywords to highlight (your resume already contains the detected job keywords).";

/// Options shared by the check and highlight workflows.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub extract: ExtractOptions,
    /// Matched keywords listed in the summary.
    pub top_matched: usize,
    /// Missing keywords listed in the summary.
    pub top_missing: usize,
    /// Missing keywords sent for highlighting.
    pub max_highlight: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for CheckOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            extract: ExtractOptions::from(&config.extract),
            top_matched: config.report.top_matched,
            top_missing: config.report.top_missing,
            max_highlight: config.highlight.max_keywords.min(MAX_KEYWORDS_PER_REQUEST),
        }
    }
}

// ---------------------------------------------------------------------------
// Check
// ---------------------------------------------------------------------------

/// Result of comparing a resume against a job page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The job text produced no keywords, so there is nothing to score.
    NoJobKeywords,
    Scored(MatchReport),
}

impl CheckOutcome {
    /// Human-readable summary, listing the top matched and missing keywords.
    pub fn summary(&self, opts: &CheckOptions) -> String {
        match self {
            Self::NoJobKeywords => NO_JOB_KEYWORDS_MESSAGE.to_string(),
            Self::Scored(report) => format!(
                "Match score: {}%\n\nTop matched ({}): {}\n\nTop missing: {}",
                report.score,
                report.matched.len(),
                join_or_dash(&report.matched, opts.top_matched),
                join_or_dash(&report.missing, opts.top_missing),
            ),
        }
    }
}

fn join_or_dash(keywords: &[String], limit: usize) -> String {
    if keywords.is_empty() || limit == 0 {
        return "—".to_string();
    }
    keywords
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Score `resume_text` against `job_text`.
#[instrument(skip_all)]
pub fn check_match(resume_text: &str, job_text: &str, opts: &CheckOptions) -> CheckOutcome {
    let resume = extract_keywords(resume_text, &opts.extract);
    let job = extract_keywords(job_text, &opts.extract);

    match score_match(&resume, &job) {
        Some(report) => {
            info!(score = report.score, job_keywords = job.len(), "match checked");
            CheckOutcome::Scored(report)
        }
        None => {
            info!("job text has no keywords");
            CheckOutcome::NoJobKeywords
        }
    }
}

/// Job keywords absent from the resume, in job order, capped for highlighting.
pub fn missing_keywords(resume_text: &str, job_text: &str, opts: &CheckOptions) -> Vec<String> {
    let resume = extract_keywords(resume_text, &opts.extract);
    let resume_set = resume.to_set();
    extract_keywords(job_text, &opts.extract)
        .into_vec()
        .into_iter()
        .filter(|keyword| !resume_set.contains(keyword.as_str()))
        .take(opts.max_highlight)
        .collect()
}

// ---------------------------------------------------------------------------
// Page round-trips
// ---------------------------------------------------------------------------

/// Ask the page for its visible text. No reply reads as an empty page.
pub fn request_job_text(page: &mut impl PageChannel) -> String {
    match page.send(Request::GetJobText) {
        Some(Response::JobText { text }) => text,
        Some(other) => {
            warn!(?other, "unexpected reply to GET_JOB_TEXT");
            String::new()
        }
        None => String::new(),
    }
}

/// Fetch the page text over `page` and score the resume against it.
pub fn check_page(page: &mut impl PageChannel, resume_text: &str, opts: &CheckOptions) -> CheckOutcome {
    let job_text = request_job_text(page);
    check_match(resume_text, &job_text, opts)
}

/// Result of asking the page to highlight missing keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightOutcome {
    /// The resume already covers every job keyword.
    NothingMissing,
    Highlighted {
        /// Keywords sent to the page.
        requested: usize,
        /// The page's reply, if it sent one.
        result: Option<HighlightResult>,
    },
}

impl HighlightOutcome {
    pub fn message(&self) -> String {
        match self {
            Self::NothingMissing => NOTHING_MISSING_MESSAGE.to_string(),
            Self::Highlighted { requested, .. } => {
                format!("Highlighted {requested} missing keywords on the page (approx).")
            }
        }
    }
}

/// Highlight on the page the job keywords missing from the resume.
#[instrument(skip_all)]
pub fn highlight_missing(
    page: &mut impl PageChannel,
    resume_text: &str,
    opts: &CheckOptions,
) -> HighlightOutcome {
    let job_text = request_job_text(page);
    let missing = missing_keywords(resume_text, &job_text, opts);
    if missing.is_empty() {
        return HighlightOutcome::NothingMissing;
    }

    let requested = missing.len();
    let result = match page.send(Request::highlight(missing)) {
        Some(Response::Highlight { result }) => Some(result),
        Some(other) => {
            warn!(?other, "unexpected reply to HIGHLIGHT_KEYWORDS");
            None
        }
        None => None,
    };

    info!(requested, replaced = ?result.as_ref().and_then(|r| r.replaced_count), "highlight requested");
    HighlightOutcome::Highlighted { requested, result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{HostOptions, PageHost};

    /// A page that never answers.
    struct SilentPage;

    impl PageChannel for SilentPage {
        fn send(&mut self, _request: Request) -> Option<Response> {
            None
        }
    }

    fn host(body: &str) -> PageHost {
        PageHost::new(&format!("<html><body>{body}</body></html>"), HostOptions::default())
    }

    #[test]
    fn check_scores_and_summarizes() {
        let opts = CheckOptions::default();
        let outcome = check_match("Java and SQL", "Java SQL Python", &opts);
        let CheckOutcome::Scored(report) = &outcome else {
            panic!("expected a score");
        };
        assert_eq!(report.score, 67);
        assert_eq!(
            outcome.summary(&opts),
            "Match score: 67%\n\nTop matched (2): java, sql\n\nTop missing: python"
        );
    }

    #[test]
    fn empty_job_text_is_no_data() {
        let opts = CheckOptions::default();
        let outcome = check_match("rust", "the and of", &opts);
        assert_eq!(outcome, CheckOutcome::NoJobKeywords);
        assert_eq!(outcome.summary(&opts), NO_JOB_KEYWORDS_MESSAGE);
    }

    #[test]
    fn summary_uses_dash_for_empty_lists() {
        let opts = CheckOptions::default();
        let outcome = check_match("rust", "rust", &opts);
        assert!(outcome.summary(&opts).ends_with("Top missing: —"));
    }

    #[test]
    fn summary_limits_listed_keywords() {
        let opts = CheckOptions {
            top_missing: 2,
            ..CheckOptions::default()
        };
        let outcome = check_match("", "alpha beta gamma delta", &opts);
        assert!(outcome.summary(&opts).ends_with("Top missing: alpha, beta"));
    }

    #[test]
    fn check_page_reads_text_through_channel() {
        let mut page = host("<p>Kubernetes and Go</p>");
        let outcome = check_page(&mut page, "Go developer", &CheckOptions::default());
        let CheckOutcome::Scored(report) = outcome else {
            panic!("expected a score");
        };
        assert_eq!(report.matched, vec!["go"]);
        assert_eq!(report.missing, vec!["kubernetes"]);
    }

    #[test]
    fn highlight_missing_marks_only_missing_terms() {
        let mut page = host("<p>Experience with Kubernetes and Go</p>");
        let outcome = highlight_missing(&mut page, "I write Go", &CheckOptions::default());

        assert_eq!(
            outcome,
            HighlightOutcome::Highlighted {
                requested: 2,
                result: Some(HighlightResult::replaced(1)),
            }
        );
        let html = page.to_html();
        assert!(html.contains(">Kubernetes</mark>"));
        assert!(html.contains(">Experience</mark>"));
        assert!(!html.contains(">Go</mark>"));
        assert_eq!(outcome.message(), "Highlighted 2 missing keywords on the page (approx).");
    }

    #[test]
    fn nothing_missing_skips_highlighting() {
        let mut page = host("<p>Rust</p>");
        let outcome = highlight_missing(&mut page, "rust", &CheckOptions::default());
        assert_eq!(outcome, HighlightOutcome::NothingMissing);
        assert_eq!(outcome.message(), NOTHING_MISSING_MESSAGE);
        assert!(!page.to_html().contains("<mark"));
    }

    #[test]
    fn silent_page_reads_as_empty() {
        let mut page = SilentPage;
        assert_eq!(request_job_text(&mut page), "");
        assert_eq!(
            check_page(&mut page, "rust", &CheckOptions::default()),
            CheckOutcome::NoJobKeywords
        );
    }

    #[test]
    fn missing_keywords_are_capped() {
        let opts = CheckOptions {
            max_highlight: 2,
            ..CheckOptions::default()
        };
        let missing = missing_keywords("", "one1 two2 three3", &opts);
        assert_eq!(missing, vec!["one1", "two2"]);
    }
}
