//! docrag CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;

use docrag::cli::{commands, handle_error, Cli, Commands};
use docrag::domain::models::Config;
use docrag::infrastructure::config::ConfigLoader;
use docrag::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        handle_error(err, json);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    let log_config = LogConfig::try_from(&config.logging)?;
    let _logger = LoggerImpl::init(&log_config).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Ask {
            file,
            question,
            system,
            temperature,
            sources,
        } => {
            apply_temperature(&mut config, temperature)?;
            commands::ask::handle_ask(&config, &file, &question, &system, sources, cli.json).await
        }
        Commands::Chat {
            message,
            system,
            temperature,
        } => {
            apply_temperature(&mut config, temperature)?;
            commands::chat::handle_chat(&config, &message, &system, cli.json).await
        }
    }
}

fn apply_temperature(config: &mut Config, temperature: Option<f32>) -> Result<()> {
    if let Some(temperature) = temperature {
        config.rag.temperature = temperature;
        ConfigLoader::validate(config)?;
    }
    Ok(())
}
