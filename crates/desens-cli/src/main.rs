mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Logs go to stderr; stdout carries progress lines
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Run(args) => commands::run::handle(*args).await,
        cli::Commands::Decrypt { input, key_file } => {
            commands::decrypt::handle(&input, &key_file).await
        }
        cli::Commands::Keygen { key_file, force } => commands::keygen::handle(&key_file, force),
        cli::Commands::Config { path } => commands::config::handle(path),
    }
}
