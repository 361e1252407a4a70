use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use react_to_heroku::cli::{self, Cli, LogLevel};
use react_to_heroku::engine::command_executor::SystemRunner;

/// Logs go to stderr; stdout carries the progress lines
fn initialize_tracing(log_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(cli.log_level);

    let report = cli::execute(&cli, &SystemRunner).await?;
    for line in cli::summary(&report) {
        println!("{}", line);
    }

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
