//! Page host: owns a parsed document and answers [`Request`]s about it.

use tracing::{debug, instrument};

use jobmatch_highlight::{Document, HighlightOptions, NodeData, NodeId, highlight};
use jobmatch_shared::{AppConfig, HighlightResult, Result};

use crate::messages::{Request, Response};

/// Elements whose content never counts as visible text.
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template", "textarea"];

/// Elements that start and end a line of visible text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "dialog", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table", "tr",
    "ul",
];

// ---------------------------------------------------------------------------
// Channel trait
// ---------------------------------------------------------------------------

/// Something that can receive page requests.
///
/// `None` means the other side gave no reply; callers treat it like an empty one.
pub trait PageChannel {
    fn send(&mut self, request: Request) -> Option<Response>;
}

// ---------------------------------------------------------------------------
// PageHost
// ---------------------------------------------------------------------------

/// Options for a page host.
#[derive(Debug, Clone)]
pub struct HostOptions {
    /// Visible text is cut to this many characters.
    pub max_text_chars: usize,
    pub highlight: HighlightOptions,
}

impl From<&AppConfig> for HostOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_text_chars: config.page.max_text_chars,
            highlight: HighlightOptions::from(&config.highlight),
        }
    }
}

impl Default for HostOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

/// A loaded page and the operations the host side of the protocol supports.
pub struct PageHost {
    document: Document,
    opts: HostOptions,
}

impl PageHost {
    /// Parse `html` and host it.
    pub fn new(html: &str, opts: HostOptions) -> Self {
        Self {
            document: Document::parse(html),
            opts,
        }
    }

    /// Dispatch a request.
    pub fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::GetJobText => Response::JobText {
                text: self.job_text(),
            },
            Request::HighlightKeywords { keywords } => Response::Highlight {
                result: self.highlight_keywords(&keywords),
            },
        }
    }

    /// Decode a JSON request, dispatch it and encode the reply.
    pub fn handle_json(&mut self, raw: &str) -> Result<String> {
        let request = Request::decode(raw)?;
        self.handle(request).encode()
    }

    /// Visible text of the hosted page.
    pub fn job_text(&self) -> String {
        page_text(&self.document, self.opts.max_text_chars)
    }

    /// Highlight `keywords` in the hosted page.
    pub fn highlight_keywords(&mut self, keywords: &[String]) -> HighlightResult {
        highlight(&mut self.document, keywords, &self.opts.highlight)
    }

    /// Current page markup, including any highlights.
    pub fn to_html(&self) -> String {
        self.document.to_html()
    }
}

impl PageChannel for PageHost {
    fn send(&mut self, request: Request) -> Option<Response> {
        Some(self.handle(request))
    }
}

// ---------------------------------------------------------------------------
// Visible text
// ---------------------------------------------------------------------------

/// Rendered text of the document body, one line per block.
///
/// Hidden containers are skipped, whitespace inside a line collapses to single
/// spaces, blank lines are dropped, and the result is cut to `max_chars`
/// characters. A document without a body yields an empty string.
#[instrument(skip(doc))]
pub fn page_text(doc: &Document, max_chars: usize) -> String {
    let Some(body) = doc.body() else {
        return String::new();
    };

    let mut raw = String::new();
    collect_text(doc, body, &mut raw);

    let text = raw
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let text = truncate_chars(&text, max_chars).to_owned();
    debug!(chars = text.chars().count(), "page text extracted");
    text
}

enum Walk {
    Enter(NodeId),
    Exit,
}

fn collect_text(doc: &Document, root: NodeId, out: &mut String) {
    let mut stack: Vec<Walk> = doc.children(root).iter().rev().map(|&c| Walk::Enter(c)).collect();
    while let Some(step) = stack.pop() {
        let id = match step {
            Walk::Exit => {
                out.push('\n');
                continue;
            }
            Walk::Enter(id) => id,
        };
        match doc.data(id) {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(element) => {
                let name = element.name.as_str();
                if HIDDEN_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                if BLOCK_ELEMENTS.contains(&name) {
                    out.push('\n');
                    stack.push(Walk::Exit);
                } else if name == "td" || name == "th" {
                    out.push(' ');
                }
                stack.extend(doc.children(id).iter().rev().map(|&c| Walk::Enter(c)));
            }
            NodeData::Fragment => {
                stack.extend(doc.children(id).iter().rev().map(|&c| Walk::Enter(c)));
            }
            NodeData::Document | NodeData::Doctype(_) | NodeData::Comment(_) => {}
        }
    }
}

/// Cut `text` to at most `max_chars` characters, on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
