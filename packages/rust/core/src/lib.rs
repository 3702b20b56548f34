//! Orchestration for jobmatch: the page message protocol, the page host,
//! page fetching, and the check/highlight workflows built on the keyword
//! extractor and the highlighter.

pub mod fetch;
pub mod messages;
pub mod page;
pub mod workflow;

pub use messages::{MAX_KEYWORDS_PER_REQUEST, Request, Response};
pub use page::{HostOptions, PageChannel, PageHost, page_text};
pub use workflow::{CheckOptions, CheckOutcome, HighlightOutcome, check_match, check_page, highlight_missing};
