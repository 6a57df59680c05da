//! HTTP server command
//!
//! Resolves credentials, builds the pool, then serves until Ctrl+C / SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use tally_server::{create_pool, run_server, ServerConfig};

use super::resolve_startup;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: HOST:PORT, or 0.0.0.0:4000)
    #[arg(long, short = 'b', env = "TALLY_BIND")]
    pub bind: Option<SocketAddr>,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let (settings, connection) = resolve_startup().await?;
    let bind_addr = args.bind.unwrap_or(settings.bind_addr);

    tracing::info!(
        host = %connection.host,
        port = connection.port,
        database = %connection.database,
        pool_size = settings.pool.pool_size,
        queue_limit = settings.pool.queue_limit,
        "Starting tally server on {}",
        bind_addr
    );

    let pool = create_pool(&connection, &settings.pool);

    run_server(pool, ServerConfig { bind_addr })
        .await
        .context("Server error")?;

    Ok(())
}
