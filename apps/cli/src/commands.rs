//! CLI command definitions, routing, and tracing setup.

use std::path::Path;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;

use autodraft_core::{generate_topics, run_selected};
use autodraft_provider::build_provider;
use autodraft_shared::{
    OutcomeStatus, PipelineConfig, config_file_path, init_config, load_config, validate_api_key,
};
use autodraft_storage::Store;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// AutoDraft — content briefs in, reviewed HTML drafts out.
#[derive(Parser)]
#[command(
    name = "autodraft",
    version,
    about = "Generate topic candidates and expand them into risk-scored, exported HTML drafts.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate topic candidates for a brief and persist them.
    Topics {
        /// Content category, e.g. "수학" or "학습법".
        #[arg(short, long)]
        pillar: String,

        /// Target audience, e.g. "중학생" or "학부모".
        #[arg(short, long)]
        audience: String,

        /// Number of candidates to generate (defaults to the config value).
        #[arg(short = 'n', long = "count", value_parser = clap::value_parser!(u8).range(1..=50))]
        count: Option<u8>,
    },

    /// Run the draft pipeline for one or more selected topic ids.
    Run {
        /// Topic ids to process, in order.
        #[arg(required = true)]
        topic_ids: Vec<String>,
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
        0 => "autodraft=info",
        1 => "autodraft=debug",
        _ => "autodraft=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Topics {
            pillar,
            audience,
            count,
        } => cmd_topics(&pillar, &audience, count).await,
        Command::Run { topic_ids } => cmd_run(&topic_ids).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_topics(pillar: &str, audience: &str, count: Option<u8>) -> Result<()> {
    let config = load_config()?;
    validate_api_key(&config)?;

    let n = count
        .map(usize::from)
        .unwrap_or(config.defaults.topic_count as usize)
        .clamp(1, 50);

    let store = Store::open(Path::new(&config.defaults.db_path)).await?;
    let provider = build_provider(&config)?;

    let ideas = generate_topics(provider.as_ref(), &store, pillar, audience, n).await?;

    info!(count = ideas.len(), pillar, audience, "topics generated");
    println!("{}", serde_json::to_string_pretty(&ideas)?);
    Ok(())
}

async fn cmd_run(topic_ids: &[String]) -> Result<()> {
    let config = load_config()?;
    validate_api_key(&config)?;

    let store = Store::open(Path::new(&config.defaults.db_path)).await?;
    let provider = build_provider(&config)?;
    let pipeline = PipelineConfig::from(&config);

    let outcomes = run_selected(
        &pipeline,
        provider.as_ref(),
        &store,
        &store,
        topic_ids,
    )
    .await;

    let failed = outcomes
        .iter()
        .filter(|o| o.status == OutcomeStatus::Failed)
        .count();
    info!(
        total = outcomes.len(),
        failed,
        export_dir = %pipeline.export_dir.display(),
        "pipeline run complete"
    );

    println!("{}", serde_json::to_string_pretty(&outcomes)?);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("wrote {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let path = config_file_path()?;

    println!("# resolved from {}", path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
