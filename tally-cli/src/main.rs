//! tally CLI - transaction ledger service
//!
//! - `serve`: run the HTTP API
//! - `check`: test database reachability with the resolved credentials
//! - `config show` / `config validate`: inspect configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

mod commands;
mod dotenv;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    author,
    version,
    about = "Record and query financial transactions over HTTP",
    long_about = "Record and query financial transactions over HTTP. Database credentials \
                  come from AWS Secrets Manager (DB_SECRET_NAME), then DB_* environment \
                  variables, then built-in defaults."
)]
struct Cli {
    /// Enable debug logging (unless RUST_LOG is set)
    #[arg(long, global = true, env = "TALLY_DEBUG")]
    debug: bool,

    /// Load environment variables from this file instead of ./.env
    #[arg(long, global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Check that the database is reachable
    Check,
    /// Inspect configuration (show, validate)
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Before tracing so RUST_LOG from the file applies
    let loaded = dotenv::load_dotenv(cli.env_file.as_deref())?;

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;
    match loaded {
        Some(path) => info!("Loaded environment from {}", path.display()),
        None => debug!("No .env file found, using process environment only"),
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Check => commands::run_check().await?,
        Commands::Config(args) => commands::run_config(args).await?,
    }
    Ok(())
}
