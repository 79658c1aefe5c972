use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

mod commands;
mod tls;
mod uaa;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise start at info until the configured level is known.
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new("info")));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let path = cli.command.config_file_path();
    let config = config::load(path)
        .inspect_err(|e| error!(path = %path.display(), error = %e, "Failed to load configuration"))
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;

    if !from_env {
        filter_handle
            .reload(EnvFilter::new(&config.log_level))
            .context("failed to apply configured log level")?;
    }
    info!(path = %path.display(), log_level = %config.log_level, "Loaded configuration");

    match cli.command {
        Commands::Migrate(args) => commands::migrate::run(args, config).await,
        Commands::Inventory(args) => commands::inventory::run(args, config).await
    }
}
