//! # mrx-cli
//!
//! Command-line interface for Metrix smart contracts.
//!
//! ## Usage
//!
//! ```bash
//! # Address commands
//! mrx address to-hex M9Mu2sGhrxzvE56RaUUvLh3hPFBQyUrqin
//! mrx address from-hex 1006ab418af315023717b240b84e7cb31d3e6d98
//! mrx address validate 0x1006ab418af315023717b240b84e7cb31d3e6d98
//!
//! # Unit commands
//! mrx units to-decimal 150000000
//! mrx units to-satoshi 1.5
//!
//! # Query commands
//! mrx --network TestNet query balance maTQ7vSGzWWw4qV4BnFyZtVkNbX9Tnv6tK
//! mrx query receipt <txid> --wait
//! mrx query logs 0x...
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// Metrix contract CLI
#[derive(Parser, Debug)]
#[command(name = "mrx")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Network override (MainNet, TestNet or RegTest)
    #[arg(long, global = true)]
    network: Option<String>,

    /// Config file (default: ~/.metrix/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert and validate addresses
    #[command(subcommand)]
    Address(commands::address::AddressCommand),
    /// Convert amounts
    #[command(subcommand)]
    Units(commands::units::UnitsCommand),
    /// Query balances, receipts and logs
    #[command(subcommand)]
    Query(commands::query::QueryCommand),
    /// Show or edit configuration
    Config(commands::config::ConfigCommand),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let json = cli.json;
    if let Err(e) = run(cli).await {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = Config::load(cli.config.as_deref())?;

    let command = match cli.command {
        Commands::Config(cmd) => return cmd.execute(&mut config, cli.json),
        other => other,
    };

    // --network applies to this run only
    if let Some(network) = &cli.network {
        config.sdk.network = network
            .parse()
            .map_err(|e: mrx_primitives::PrimitiveError| CliError::InvalidInput(e.to_string()))?;
    }

    match command {
        Commands::Address(cmd) => cmd.execute(&config, cli.json),
        Commands::Units(cmd) => cmd.execute(cli.json),
        Commands::Query(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Config(cmd) => cmd.execute(&mut config, cli.json),
    }
}
