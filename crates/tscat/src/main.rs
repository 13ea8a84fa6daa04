//! Main entry point for tscat.

use anyhow::Context;
use clap::Parser;
use std::io;
use tscat::{init_logging, run, Cli, DEFAULT_CONFIG_FILE};
use tscat_config::{Config, ConfigLoader, ConfigValidator};
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli).await?;
    init_logging(&config.logging)?;
    ConfigValidator::validate_environment(&config)?;
    debug!("Configuration: {:?}", config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli.command, &config, &mut out)?;
    Ok(())
}

async fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    match &cli.config {
        Some(path) => ConfigLoader::new(path)
            .load()
            .await
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => ConfigLoader::new(DEFAULT_CONFIG_FILE)
            .load_or_default()
            .await
            .context("failed to load default configuration"),
    }
}
