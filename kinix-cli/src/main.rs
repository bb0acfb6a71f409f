//! kinix -- forensic content classification and risk scoring CLI

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            e.exit_code()
        }
    };

    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // Fall back to default logging so `config validate` can still report a broken file.
    let general = commands::load_config(&cli.config)
        .await
        .map(|config| config.general)
        .unwrap_or_default();

    logging::init_tracing(&general, cli.log_level.as_deref())
        .map_err(|e| CliError::Config(e.to_string()))?;
    kinix_core::metrics::describe_all();

    tracing::debug!(config = %cli.config.display(), "kinix starting");

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Scan(args) => commands::scan::execute(args, &cli.config, &writer).await,
        Commands::Rules(args) => commands::rules::execute(args, &cli.config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}
