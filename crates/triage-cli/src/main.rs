//! Triage CLI - derive task priorities from natural language.

use anyhow::Result;
use clap::Parser as _;
use cli::Cli;
use tracing_subscriber::EnvFilter;

mod cli;
mod handlers;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "triage=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    handlers::dispatch(cli).await
}
