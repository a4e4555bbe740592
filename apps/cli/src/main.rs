//! AutoDraft CLI — turn a content brief into scored, exported HTML drafts.
//!
//! Generates topic candidates for a pillar/audience brief, expands selected
//! topics into Markdown drafts, runs them through the quality gate, and
//! exports each as a standalone HTML document.

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
