//! opsgate - health, error and request monitoring service
//!
//! Loads configuration, installs logging and serves the monitoring endpoints.

#![allow(missing_docs)]

use anyhow::Context;
use clap::Parser;
use opsgate::config::Config;
use opsgate::server;
use opsgate::utils::logging::init_logging;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "opsgate", version, about = "Health, error and request monitoring service")]
struct Cli {
    /// YAML configuration file; defaults apply when omitted
    #[arg(short, long, env = "OPSGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Bind host, overriding configuration
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overriding configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

async fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };

    config
        .apply_env_overrides()
        .context("applying environment overrides")?;
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate().context("validating configuration")?;
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli).await?;
    init_logging(&config.logging)?;

    if cli.check {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    server::run_server(config).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display keeps the context chain readable
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
