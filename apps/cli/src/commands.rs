//! CLI command definitions, routing, and tracing setup.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use jobmatch_core::fetch::{FetchOptions, fetch_page};
use jobmatch_core::{
    CheckOptions, CheckOutcome, HighlightOutcome, HostOptions, PageHost, check_page,
    highlight_missing,
};
use jobmatch_keywords::{ExtractOptions, keyword_counts};
use jobmatch_shared::{AppConfig, init_config, load_config, load_config_from};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// jobmatch: see which job keywords your resume is missing.
#[derive(Parser)]
#[command(
    name = "jobmatch",
    version,
    about = "Score a resume against a job posting and highlight the missing keywords.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.jobmatch/jobmatch.toml.
    #[arg(long, global = true, env = "JOBMATCH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Where the job posting comes from.
#[derive(clap::Args)]
pub(crate) struct PageSource {
    /// Saved HTML of the job posting.
    #[arg(long, conflicts_with = "url", required_unless_present = "url")]
    pub page: Option<PathBuf>,

    /// URL of the job posting.
    #[arg(long)]
    pub url: Option<String>,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// List the keywords of a text file, most frequent first.
    Keywords {
        /// Text file to read (`-` for stdin).
        file: PathBuf,

        /// Shortest keyword kept.
        #[arg(long)]
        min_length: Option<usize>,

        /// Show at most this many keywords.
        #[arg(long)]
        limit: Option<usize>,

        /// Print occurrence counts next to each keyword.
        #[arg(long)]
        counts: bool,
    },

    /// Score a resume against a job posting.
    Check {
        /// Resume as .txt or .md (`-` for stdin).
        #[arg(long)]
        resume: PathBuf,

        #[command(flatten)]
        source: PageSource,

        /// Shortest keyword kept.
        #[arg(long)]
        min_length: Option<usize>,

        /// Emit a JSON report instead of the text summary.
        #[arg(long)]
        json: bool,
    },

    /// Write a copy of the posting with missing keywords highlighted.
    Highlight {
        /// Resume as .txt or .md (`-` for stdin).
        #[arg(long)]
        resume: PathBuf,

        #[command(flatten)]
        source: PageSource,

        /// Output HTML file.
        #[arg(short, long)]
        out: PathBuf,

        /// Highlight at most this many missing keywords.
        #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        max_keywords: Option<usize>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "jobmatch=info",
        1 => "jobmatch=debug",
        _ => "jobmatch=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Command::Keywords {
            file,
            min_length,
            limit,
            counts,
        } => cmd_keywords(&config, &file, min_length, limit, counts),
        Command::Check {
            resume,
            source,
            min_length,
            json,
        } => cmd_check(&config, &resume, &source, min_length, json).await,
        Command::Highlight {
            resume,
            source,
            out,
            max_keywords,
        } => cmd_highlight(&config, &resume, &source, &out, max_keywords).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_keywords(
    config: &AppConfig,
    file: &Path,
    min_length: Option<usize>,
    limit: Option<usize>,
    counts: bool,
) -> Result<()> {
    let text = read_text_source(file)?;
    let mut opts = ExtractOptions::from(&config.extract);
    if let Some(min) = min_length {
        opts.min_length = min;
    }

    let ranked = keyword_counts(&text, &opts);
    info!(keywords = ranked.len(), "keywords extracted");

    for entry in ranked.iter().take(limit.unwrap_or(usize::MAX)) {
        if counts {
            println!("{:>5}  {}", entry.count, entry.keyword);
        } else {
            println!("{}", entry.keyword);
        }
    }
    Ok(())
}

/// JSON form of a check, for scripting.
#[derive(Serialize)]
struct CheckReport {
    generated_at: DateTime<Utc>,
    /// `null` when the posting produced no keywords.
    score: Option<u8>,
    matched: Vec<String>,
    missing: Vec<String>,
}

async fn cmd_check(
    config: &AppConfig,
    resume: &Path,
    source: &PageSource,
    min_length: Option<usize>,
    json: bool,
) -> Result<()> {
    let resume_text = read_text_source(resume)?;
    let mut host = load_page(config, source).await?;

    let mut opts = CheckOptions::from(config);
    if let Some(min) = min_length {
        opts.extract.min_length = min;
    }

    let outcome = check_page(&mut host, &resume_text, &opts);

    if json {
        let report = match &outcome {
            CheckOutcome::Scored(report) => CheckReport {
                generated_at: Utc::now(),
                score: Some(report.score),
                matched: report.matched.clone(),
                missing: report.missing.clone(),
            },
            CheckOutcome::NoJobKeywords => CheckReport {
                generated_at: Utc::now(),
                score: None,
                matched: Vec::new(),
                missing: Vec::new(),
            },
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", outcome.summary(&opts));
    }
    Ok(())
}

async fn cmd_highlight(
    config: &AppConfig,
    resume: &Path,
    source: &PageSource,
    out: &Path,
    max_keywords: Option<usize>,
) -> Result<()> {
    let resume_text = read_text_source(resume)?;
    let mut host = load_page(config, source).await?;

    let mut opts = CheckOptions::from(config);
    if let Some(max) = max_keywords {
        opts.max_highlight = max.min(jobmatch_core::MAX_KEYWORDS_PER_REQUEST);
    }

    let outcome = highlight_missing(&mut host, &resume_text, &opts);
    println!("{}", outcome.message());

    if let HighlightOutcome::Highlighted { result: Some(result), .. } = &outcome {
        if !result.ok {
            warn!(reason = ?result.reason, "page did not highlight");
        }
    }

    std::fs::write(out, host.to_html())
        .wrap_err_with(|| format!("cannot write {}", out.display()))?;
    println!("  Written: {}", out.display());
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config written to {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Input helpers
// ---------------------------------------------------------------------------

/// Read a resume or text file; `-` reads stdin.
fn read_text_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .wrap_err("cannot read stdin")?;
        return Ok(text);
    }

    let known = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "txt" | "md"));
    if !known {
        warn!(path = %path.display(), "expected a .txt or .md file, reading as plain text");
    }

    std::fs::read_to_string(path).wrap_err_with(|| format!("cannot read {}", path.display()))
}

/// Load the job posting from a file or URL into a page host.
async fn load_page(config: &AppConfig, source: &PageSource) -> Result<PageHost> {
    let html = match (&source.page, &source.url) {
        (Some(path), _) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("cannot read {}", path.display()))?,
        (None, Some(url)) => {
            let url = Url::parse(url).map_err(|e| eyre!("invalid URL '{url}': {e}"))?;
            let spinner = fetch_spinner(&url);
            let fetched = fetch_page(&url, &FetchOptions::from(&config.fetch)).await;
            spinner.finish_and_clear();
            fetched?
        }
        (None, None) => return Err(eyre!("either --page or --url is required")),
    };

    Ok(PageHost::new(&html, HostOptions::from(config)))
}

fn fetch_spinner(url: &Url) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    spinner.set_message(format!("Fetching {url}"));
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}
