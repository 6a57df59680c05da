use std::fmt::{self, Write as _};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tally_core::{ConnectionConfig, Environment, ServiceSettings};

use super::resolve_startup;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Resolve and print the effective configuration (password redacted)
    Show,
    /// Check numeric settings without contacting the secret store
    Validate,
}

pub async fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => run_show().await,
        ConfigCommands::Validate => run_validate(),
    }
}

async fn run_show() -> Result<()> {
    let (settings, connection) = resolve_startup().await?;
    print!("{}", render(&settings, &connection)?);
    Ok(())
}

fn run_validate() -> Result<()> {
    ServiceSettings::from_env(&Environment::capture())
        .context("Invalid service configuration")?;
    println!("Configuration valid");
    Ok(())
}

fn render(settings: &ServiceSettings, connection: &ConnectionConfig) -> Result<String, fmt::Error> {
    let sources = &connection.sources;
    let password = if connection.has_password() {
        "<redacted>"
    } else {
        "<empty>"
    };
    let secret = match &settings.secret.secret_id {
        Some(id) => format!("{} ({})", id, settings.secret.region),
        None => "none".to_string(),
    };

    let pool = &settings.pool;
    let mut out = String::new();
    writeln!(out, "Connection:")?;
    writeln!(out, "  host:      {} ({})", connection.host, sources.host)?;
    writeln!(out, "  port:      {} ({})", connection.port, sources.port)?;
    writeln!(out, "  user:      {} ({})", connection.user, sources.user)?;
    writeln!(out, "  password:  {} ({})", password, sources.password)?;
    writeln!(out, "  database:  {} ({})", connection.database, sources.database)?;
    writeln!(out, "  secret:    {}", secret)?;
    writeln!(out, "Pool:")?;
    writeln!(out, "  size:              {}", pool.pool_size)?;
    writeln!(out, "  queue limit:       {}", pool.queue_limit)?;
    writeln!(out, "  acquire timeout:   {}s", pool.acquire_timeout.as_secs())?;
    writeln!(out, "  statement timeout: {}s", pool.statement_timeout.as_secs())?;
    writeln!(out, "Server:")?;
    writeln!(out, "  bind:      {}", settings.bind_addr)?;
    Ok(out)
}
