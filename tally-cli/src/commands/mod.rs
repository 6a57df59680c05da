//! Command implementations for the tally CLI

pub mod check;
pub mod config;
pub mod serve;

pub use check::run_check;
pub use config::run_config;
pub use serve::run_serve;

use anyhow::{Context, Result};
use tally_core::{ConfigResolver, ConnectionConfig, Environment, ServiceSettings};

/// Read settings from the environment and resolve connection credentials.
pub(crate) async fn resolve_startup() -> Result<(ServiceSettings, ConnectionConfig)> {
    let env = Environment::capture();
    let settings = ServiceSettings::from_env(&env).context("Invalid service configuration")?;
    let connection = ConfigResolver::new(env, settings.secret.clone())
        .resolve()
        .await;
    Ok((settings, connection))
}
