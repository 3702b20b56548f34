//! Request/response messages exchanged with a page host.
//!
//! Messages travel as JSON objects tagged by `type`. Decoding is strict about
//! the tag and lenient about the payload: a `keywords` field that is not an
//! array decodes as empty, and non-string entries are dropped.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use jobmatch_shared::{HighlightResult, JobMatchError, Result};

/// Keywords accepted in a single highlight request.
pub const MAX_KEYWORDS_PER_REQUEST: usize = 200;

/// A request sent to the page host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    /// Ask for the page's visible text.
    GetJobText,
    /// Mark the given keywords on the page.
    HighlightKeywords {
        #[serde(default, deserialize_with = "lenient_keywords")]
        keywords: Vec<String>,
    },
}

/// Reply from the page host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    JobText { text: String },
    Highlight { result: HighlightResult },
}

impl Request {
    /// Decode a request from its JSON form.
    pub fn decode(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| JobMatchError::parse(format!("invalid request: {e}")))
    }

    /// Build a highlight request, applying the per-request cap.
    pub fn highlight(keywords: impl IntoIterator<Item = String>) -> Self {
        Self::HighlightKeywords {
            keywords: keywords.into_iter().take(MAX_KEYWORDS_PER_REQUEST).collect(),
        }
    }
}

impl Response {
    /// Encode a response as JSON.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| JobMatchError::parse(format!("cannot encode response: {e}")))
    }
}

fn lenient_keywords<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let keywords = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(keyword) => Some(keyword),
                _ => None,
            })
            .take(MAX_KEYWORDS_PER_REQUEST)
            .collect(),
        _ => Vec::new(),
    };
    Ok(keywords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_get_job_text() {
        let request = Request::decode(r#"{"type":"GET_JOB_TEXT"}"#).unwrap();
        assert_eq!(request, Request::GetJobText);
    }

    #[test]
    fn decodes_highlight_and_drops_non_strings() {
        let request = Request::decode(
            r#"{"type":"HIGHLIGHT_KEYWORDS","keywords":["rust",42,null,{"x":1},"go"]}"#,
        )
        .unwrap();
        assert_eq!(
            request,
            Request::HighlightKeywords {
                keywords: vec!["rust".into(), "go".into()]
            }
        );
    }

    #[test]
    fn non_array_keywords_decode_as_empty() {
        for raw in [
            r#"{"type":"HIGHLIGHT_KEYWORDS","keywords":"rust"}"#,
            r#"{"type":"HIGHLIGHT_KEYWORDS"}"#,
        ] {
            let request = Request::decode(raw).unwrap();
            assert_eq!(request, Request::HighlightKeywords { keywords: vec![] });
        }
    }

    #[test]
    fn keyword_list_is_capped() {
        let many: Vec<String> = (0..250).map(|i| format!("kw{i}")).collect();
        let raw = json!({"type": "HIGHLIGHT_KEYWORDS", "keywords": many.clone()}).to_string();
        let Request::HighlightKeywords { keywords } = Request::decode(&raw).unwrap() else {
            panic!("expected highlight request");
        };
        assert_eq!(keywords.len(), MAX_KEYWORDS_PER_REQUEST);

        let Request::HighlightKeywords { keywords } = Request::highlight(many) else {
            panic!("expected highlight request");
        };
        assert_eq!(keywords.len(), MAX_KEYWORDS_PER_REQUEST);
    }

    #[test]
    fn unknown_type_is_a_parse_error() {
        let err = Request::decode(r#"{"type":"RELOAD"}"#).unwrap_err();
        assert!(matches!(err, JobMatchError::Parse { .. }));
        assert!(Request::decode("not json").is_err());
    }

    #[test]
    fn responses_encode_to_host_shapes() {
        let text = Response::JobText { text: "hi".into() }.encode().unwrap();
        assert_eq!(text, r#"{"text":"hi"}"#);

        let highlight = Response::Highlight {
            result: HighlightResult::replaced(2),
        };
        let value: Value = serde_json::from_str(&highlight.encode().unwrap()).unwrap();
        assert_eq!(value, json!({"result": {"ok": true, "replacedCount": 2}}));
    }
}
