use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// Ethereum chain-tip tracker
#[derive(Parser)]
#[command(name = "chain-tip-tracker")]
#[command(about = "Track the latest Ethereum block and serve address subscriptions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the block poller and the HTTP query server
    Serve(commands::serve::ServeCommand),
    /// Fetch the latest block number once and print it
    BlockNumber(commands::block_number::BlockNumberCommand),
}

pub async fn run() -> AppResult<()> {
    // Uses RUST_LOG environment variable (defaults to "info" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(command) => command.run().await,
        Commands::BlockNumber(command) => command.run().await,
    }
}
