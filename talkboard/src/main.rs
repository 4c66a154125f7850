//! Command-line entry point for the talks site tools

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use talkboard_core::config::LoggingConfig;
use talkboard_core::AppConfig;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_tracing(&config.logging, cli.log_json);
    debug!(endpoint = %config.form.endpoint, "Configuration loaded");

    match cli.command {
        Command::Countdown(args) => commands::countdown(&config, args).await,
        Command::Submit(args) => commands::submit(&config, args).await,
        Command::Schedule(command) => commands::schedule(&config, command),
    }
}

fn init_tracing(logging: &LoggingConfig, force_json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            let default_level = logging.effective_level(cfg!(debug_assertions));

            format!(
                "{}={},talkboard_core={}",
                env!("CARGO_CRATE_NAME").replace('-', "_"),
                default_level,
                default_level
            ).into()
        });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true);

    let is_json = force_json
        || logging.json
        || std::env::var("LOG_FORMAT")
            .map(|v| v.to_lowercase() == "json")
            .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}
