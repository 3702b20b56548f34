//! Fetch a job posting's HTML over HTTP.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use jobmatch_shared::{FetchConfig, JobMatchError, Result};

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// Maximum response size we accept (10 MB).
const MAX_RESPONSE_SIZE: u64 = 10 * 1024 * 1024;

/// Options for page fetching.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for FetchOptions {
    fn from(config: &FetchConfig) -> Self {
        Self {
            timeout_secs: config.timeout_secs,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Download the HTML at `url`.
///
/// Only `http` and `https` URLs are accepted. Non-success statuses and bodies
/// over 10 MB are errors.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_page(url: &Url, opts: &FetchOptions) -> Result<String> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(JobMatchError::validation(format!(
            "unsupported URL scheme '{}': {url}",
            url.scheme()
        )));
    }

    let client = build_client(opts)?;
    info!("fetching job page");

    let mut response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| JobMatchError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(JobMatchError::Network(format!("{url}: HTTP {status}")));
    }

    if let Some(len) = response.content_length() {
        if len > MAX_RESPONSE_SIZE {
            return Err(JobMatchError::validation(format!(
                "{url}: response too large ({len} bytes, max {MAX_RESPONSE_SIZE})"
            )));
        }
    }

    let mut bytes: Vec<u8> = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| JobMatchError::Network(format!("{url}: failed to read body: {e}")))?
    {
        if (bytes.len() + chunk.len()) as u64 > MAX_RESPONSE_SIZE {
            return Err(JobMatchError::validation(format!(
                "{url}: response too large (over {MAX_RESPONSE_SIZE} bytes)"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    let body = String::from_utf8_lossy(&bytes).into_owned();

    debug!(bytes = body.len(), "job page fetched");
    Ok(body)
}

/// Build a reqwest client with appropriate settings.
fn build_client(opts: &FetchOptions) -> Result<Client> {
    Client::builder()
        .user_agent(opts.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(Duration::from_secs(opts.timeout_secs))
        .build()
        .map_err(|e| JobMatchError::Network(format!("failed to build HTTP client: {e}")))
}
