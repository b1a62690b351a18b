//! Newsvec CLI - Command-line interface
//!
//! Usage:
//!   newsvec run [--config newsvec.toml]
//!   newsvec show-config [--config newsvec.toml]
//!
//! Configuration comes from a TOML file when given, with environment
//! variables taking precedence. A `.env` file in the working
//! directory is loaded first.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use newsvec_core::AppConfig;
use newsvec_pipeline::{Pipeline, RunOutcome};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "newsvec")]
#[command(about = "News feed to vector index ingestion pipeline")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file; environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one full ingestion run
    Run,
    /// Print the effective configuration (credentials masked)
    ShowConfig,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    match cli.command {
        Commands::Run => {
            let pipeline = Pipeline::from_config(config).context("pipeline setup failed")?;
            match pipeline.run().await? {
                RunOutcome::NoArticles => {
                    tracing::warn!("no articles found, nothing indexed");
                }
                RunOutcome::Indexed {
                    articles,
                    dimension,
                } => {
                    tracing::info!(articles, dimension, "ingestion run finished");
                }
            }
        }
        Commands::ShowConfig => {
            let rendered = toml::to_string_pretty(&config.redacted())
                .context("failed to render configuration")?;
            println!("{rendered}");
        }
    }

    Ok(())
}
