//! QuickChat CLI entry point

use clap::Parser;
use tracing::{error, info};

use quickchat_cli::{cli::Cli, commands::CommandDispatcher, config::AppConfig, error::Result};

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    setup_logging(cli.verbose);

    // Load configuration
    let mut config = load_configuration(&cli)?;

    // Override data directory if specified
    if let Some(data_dir) = &cli.data_dir {
        config.cli.data_dir = Some(data_dir.into());
    }

    if let Err(e) = CommandDispatcher::execute(cli.command(), &config) {
        error!("Command execution failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Setup logging based on verbosity level
fn setup_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Load configuration from file or use defaults
fn load_configuration(cli: &Cli) -> Result<AppConfig> {
    if let Some(config_path) = &cli.config {
        info!("Loading configuration from: {}", config_path);
        Ok(AppConfig::load_from_file(config_path)?)
    } else {
        info!("Using default configuration");
        Ok(AppConfig::default())
    }
}
