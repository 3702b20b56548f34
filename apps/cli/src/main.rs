//! jobmatch CLI: compare a resume against a job posting.
//!
//! Scores how many of a posting's keywords a resume covers and writes a copy
//! of the posting with the missing keywords highlighted.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
