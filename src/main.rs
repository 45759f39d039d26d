mod bibliography;
mod cli;
mod config;
mod error;
mod export;
mod form;
mod llm;
mod ontology;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::form::SessionState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing - only show warnings by default, use RUST_LOG=info for more detail
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    let expertise = match Config::load_or_default() {
        Ok(config) => config.expertise,
        Err(e) => {
            tracing::warn!("Ignoring unreadable configuration: {:#}", e);
            Default::default()
        }
    };
    let mut session = SessionState::new(expertise);

    match cli.command {
        Commands::Init { force } => {
            cli::commands::init::run(force).await?;
        }
        Commands::Auth {
            provider,
            key,
            list,
        } => {
            cli::commands::auth::run(provider, key, list).await?;
        }
        Commands::Synth(args) => {
            cli::commands::synth::run(args, &session).await?;
        }
        Commands::Render {
            input,
            authors,
            title,
            report,
        } => {
            cli::commands::render::run(input, authors, title, report).await?;
        }
        Commands::Explore {
            section,
            science,
            guide,
        } => {
            cli::commands::explore::run(section, science, guide, &mut session).await?;
        }
    }

    Ok(())
}
