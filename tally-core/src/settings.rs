//! Service settings read from the environment
//!
//! Everything except the connection credentials lives here. Credentials go
//! through [`ConfigResolver`](crate::ConfigResolver) because they may come
//! from the secret store.

use std::net::SocketAddr;
use std::time::Duration;

use crate::env::{self, Environment};
use crate::error::ConfigError;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_POOL_SIZE: u32 = 10;
pub const DEFAULT_QUEUE_LIMIT: usize = 100;
/// Upper bound for `DB_POOL_QUEUE_LIMIT`
pub const MAX_QUEUE_LIMIT: usize = 1_000_000;
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_BIND_PORT: u16 = 4000;

/// Where to look for database credentials in the secret store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretSettings {
    /// Secret identifier; `None` skips the secret store entirely
    pub secret_id: Option<String>,
    /// Secret store region
    pub region: String,
}

impl SecretSettings {
    pub fn from_env(env: &Environment) -> Self {
        Self {
            secret_id: env.get_owned(env::DB_SECRET_NAME),
            region: env
                .get_owned(env::AWS_REGION)
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        }
    }
}

/// Connection pool sizing and deadlines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Maximum concurrently checked-out connections
    pub pool_size: u32,
    /// Maximum callers waiting for a connection once the pool is exhausted
    pub queue_limit: usize,
    /// Maximum wait for a single checkout
    pub acquire_timeout: Duration,
    /// Deadline for one store operation, checkout included
    pub statement_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            queue_limit: DEFAULT_QUEUE_LIMIT,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
        }
    }
}

impl PoolSettings {
    pub fn from_env(env: &Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let pool_size = env
            .parse::<u32>(env::DB_POOL_SIZE)?
            .unwrap_or(defaults.pool_size);
        if pool_size == 0 {
            return Err(ConfigError::invalid_value(
                env::DB_POOL_SIZE,
                "0",
                "pool size must be at least 1",
            ));
        }

        let queue_limit = env
            .parse::<usize>(env::DB_POOL_QUEUE_LIMIT)?
            .unwrap_or(defaults.queue_limit);
        if queue_limit > MAX_QUEUE_LIMIT {
            return Err(ConfigError::invalid_value(
                env::DB_POOL_QUEUE_LIMIT,
                queue_limit.to_string(),
                format!("queue limit must be at most {}", MAX_QUEUE_LIMIT),
            ));
        }

        Ok(Self {
            pool_size,
            queue_limit,
            acquire_timeout: seconds(env, env::DB_ACQUIRE_TIMEOUT_SECS)?
                .unwrap_or(defaults.acquire_timeout),
            statement_timeout: seconds(env, env::DB_STATEMENT_TIMEOUT_SECS)?
                .unwrap_or(defaults.statement_timeout),
        })
    }

    /// Callers allowed in flight at once: checked out plus waiting.
    pub fn capacity(&self) -> usize {
        (self.pool_size as usize).saturating_add(self.queue_limit)
    }
}

fn seconds(env: &Environment, key: &'static str) -> Result<Option<Duration>, ConfigError> {
    match env.parse::<u64>(key)? {
        Some(0) => Err(ConfigError::invalid_value(
            key,
            "0",
            "timeout must be at least 1 second",
        )),
        other => Ok(other.map(Duration::from_secs)),
    }
}

/// A bad `DB_PORT` stops startup here; the resolver only warns about it.
fn check_db_port(env: &Environment) -> Result<(), ConfigError> {
    match env.parse::<u16>(env::DB_PORT)? {
        Some(0) => Err(ConfigError::invalid_value(
            env::DB_PORT,
            "0",
            "port must be between 1 and 65535",
        )),
        _ => Ok(()),
    }
}

/// All non-credential settings for the service
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub secret: SecretSettings,
    pub pool: PoolSettings,
    /// HTTP listen address (`HOST`:`PORT`)
    pub bind_addr: SocketAddr,
}

impl ServiceSettings {
    pub fn from_env(env: &Environment) -> Result<Self, ConfigError> {
        let host = env.get(env::HOST).unwrap_or(DEFAULT_BIND_HOST);
        let port = env.parse::<u16>(env::PORT)?.unwrap_or(DEFAULT_BIND_PORT);
        let bind_addr = format!("{}:{}", host, port)
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid_value(env::HOST, host, e.to_string()))?;
        check_db_port(env)?;

        Ok(Self {
            secret: SecretSettings::from_env(env),
            pool: PoolSettings::from_env(env)?,
            bind_addr,
        })
    }
}
