use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use ja_cli::{execute, logging, Cli};
use ja_core::services::token::{TokenService, TokenServiceConfig};
use ja_shared::AppConfig;
use tracing::info;

fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    info!(environment = %config.environment, "Starting ja-token");

    let service = TokenService::new(TokenServiceConfig::from(&config.jwt))
        .context("Failed to initialize token service")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli.command, &service, &mut out)
}
