//! Shared types, error model, and configuration for jobmatch.
//!
//! This crate is the foundation depended on by all other jobmatch crates.
//! It provides:
//! - [`JobMatchError`]: the unified error type
//! - Domain types ([`KeywordList`], [`MatchReport`], [`HighlightResult`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ExtractConfig, FetchConfig, HighlightConfig, PageConfig, ReportConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{JobMatchError, Result};
pub use types::{HighlightResult, KeywordCount, KeywordList, MatchReport};
