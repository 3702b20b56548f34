//! Application configuration for jobmatch.
//!
//! User config lives at `~/.jobmatch/jobmatch.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{JobMatchError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "jobmatch.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".jobmatch";

// ---------------------------------------------------------------------------
// Config structs (matching jobmatch.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Keyword extraction settings.
    #[serde(default)]
    pub extract: ExtractConfig,

    /// Highlighting settings.
    #[serde(default)]
    pub highlight: HighlightConfig,

    /// Visible page text settings.
    #[serde(default)]
    pub page: PageConfig,

    /// Summary report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// HTTP fetch settings.
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// `[extract]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Shortest token (in characters) kept as a keyword.
    #[serde(default = "default_min_length")]
    pub min_length: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
        }
    }
}

fn default_min_length() -> usize {
    2
}

/// `[highlight]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Upper bound on keywords folded into one highlight pattern.
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,

    /// Inline CSS applied to every `<mark>` element.
    #[serde(default = "default_mark_style")]
    pub mark_style: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            max_keywords: default_max_keywords(),
            mark_style: default_mark_style(),
        }
    }
}

fn default_max_keywords() -> usize {
    200
}
fn default_mark_style() -> String {
    "background: #ffea8a; color: #000; padding:0 2px; border-radius:2px;".into()
}

/// `[page]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Visible text is cut to this many characters before extraction.
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            max_text_chars: default_max_text_chars(),
        }
    }
}

fn default_max_text_chars() -> usize {
    100_000
}

/// `[report]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Matched keywords listed in the summary.
    #[serde(default = "default_top_matched")]
    pub top_matched: usize,

    /// Missing keywords listed in the summary.
    #[serde(default = "default_top_missing")]
    pub top_missing: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_matched: default_top_matched(),
            top_missing: default_top_missing(),
        }
    }
}

fn default_top_matched() -> usize {
    10
}
fn default_top_missing() -> usize {
    20
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with page requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    15
}
fn default_user_agent() -> String {
    concat!("jobmatch/", env!("CARGO_PKG_VERSION")).into()
}

impl AppConfig {
    /// Reject values that would make extraction or highlighting meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.extract.min_length == 0 {
            return Err(JobMatchError::config("extract.min_length must be at least 1"));
        }
        if self.highlight.max_keywords == 0 {
            return Err(JobMatchError::config("highlight.max_keywords must be at least 1"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.jobmatch/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| JobMatchError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.jobmatch/jobmatch.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| JobMatchError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        JobMatchError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| JobMatchError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| JobMatchError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| JobMatchError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("min_length"));
        assert!(toml_str.contains("max_keywords"));
        assert!(toml_str.contains("#ffea8a"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.extract.min_length, 2);
        assert_eq!(parsed.highlight.max_keywords, 200);
        assert_eq!(parsed.report.top_missing, 20);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[extract]
min_length = 3

[report]
top_matched = 5
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.extract.min_length, 3);
        assert_eq!(config.report.top_matched, 5);
        assert_eq!(config.report.top_missing, 20);
        assert_eq!(config.page.max_text_chars, 100_000);
    }

    #[test]
    fn load_from_file_rejects_zero_max_keywords() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobmatch.toml");
        std::fs::write(&path, "[highlight]\nmax_keywords = 0\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("max_keywords"));
    }

    #[test]
    fn load_from_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, JobMatchError::Io { .. }));
    }
}
