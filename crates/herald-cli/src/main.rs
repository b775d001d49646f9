use std::process;

use clap::Parser;
use herald_cli::cli::{Cli, Commands};
use herald_cli::commands;
use herald_config::HeraldConfig;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Exit codes for different scenarios
mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const DRAFT_FAILURE: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over the flags
    let filter = EnvFilter::builder()
        .with_default_directive(cli.log_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match HeraldConfig::load(&cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(exit_codes::CONFIG_ERROR);
        }
    };
    debug!("Configuration: {:?}", config);

    let code = match cli.command {
        None | Some(Commands::Publish(_)) => {
            let runner = match commands::publish::runner(&config) {
                Ok(runner) => runner,
                Err(e) => {
                    error!("{:#}", e);
                    process::exit(exit_codes::CONFIG_ERROR);
                }
            };

            match commands::publish::execute(&runner).await {
                Ok(report) if report.has_failures() => exit_codes::DRAFT_FAILURE,
                Ok(_) => exit_codes::SUCCESS,
                Err(e) => {
                    error!("{:#}", e);
                    exit_codes::DRAFT_FAILURE
                }
            }
        }
        Some(Commands::Validate { paths, .. }) => {
            match commands::validate::execute(&config, paths) {
                Ok(true) => exit_codes::SUCCESS,
                Ok(false) => exit_codes::DRAFT_FAILURE,
                Err(e) => {
                    error!("{:#}", e);
                    exit_codes::DRAFT_FAILURE
                }
            }
        }
    };

    process::exit(code);
}
