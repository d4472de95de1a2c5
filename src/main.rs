use clap::error::ErrorKind;
use clap::Parser;
use std::process;
use usage_export::cli::export::{self, EXIT_FAILURE};
use usage_export::cli::Cli;
use usage_export::config::load_optional_config;
use usage_export::logging::init_logging;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            process::exit(EXIT_FAILURE);
        }
    };

    let config = match load_optional_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(EXIT_FAILURE);
        }
    };

    let guard = match init_logging(&cli.effective_log_level(&config), &config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FAILURE);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "usage-export - CircleCI usage export tool"
    );

    let exit_code = match export::execute(&cli, &config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FAILURE
        }
    };

    // Flush file logs before exiting
    drop(guard);
    process::exit(exit_code);
}
