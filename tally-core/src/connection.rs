//! Resolved database connection parameters

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::env::{self, Environment};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_USER: &str = "postgres";
pub const DEFAULT_DATABASE: &str = "postgres";

/// Where a resolved field came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Secret,
    Environment,
    Default,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secret => write!(f, "secret store"),
            Self::Environment => write!(f, "environment"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Per-field provenance of a [`ConnectionConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSources {
    pub host: ValueSource,
    pub port: ValueSource,
    pub user: ValueSource,
    pub password: ValueSource,
    pub database: ValueSource,
}

/// Database connection parameters, immutable once resolved.
///
/// Only [`ConfigResolver::resolve`](crate::ConfigResolver::resolve) and
/// [`ConnectionConfig::from_env`] produce one, so holding a value means
/// resolution has completed. The password is redacted in `Debug` output.
#[derive(Debug)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub database: String,
    pub sources: FieldSources,
}

impl ConnectionConfig {
    /// Resolve from environment variables and defaults only.
    pub fn from_env(env: &Environment) -> Self {
        Self::layered(PartialConnection::default(), PartialConnection::from_env(env))
    }

    /// Merge two layers field by field: `primary`, then `fallback`, then the
    /// built-in default.
    pub(crate) fn layered(primary: PartialConnection, fallback: PartialConnection) -> Self {
        let (host, host_src) = pick(primary.host, fallback.host, || DEFAULT_HOST.to_string());
        let (port, port_src) = pick(primary.port, fallback.port, || DEFAULT_PORT);
        let (user, user_src) = pick(primary.user, fallback.user, || DEFAULT_USER.to_string());
        let (password, password_src) = pick(primary.password, fallback.password, String::new);
        let (database, database_src) =
            pick(primary.database, fallback.database, || DEFAULT_DATABASE.to_string());

        Self {
            host,
            port,
            user,
            password: SecretString::from(password),
            database,
            sources: FieldSources {
                host: host_src,
                port: port_src,
                user: user_src,
                password: password_src,
                database: database_src,
            },
        }
    }

    /// Whether a non-empty password was resolved.
    pub fn has_password(&self) -> bool {
        !self.password.expose_secret().is_empty()
    }
}

/// One layer of connection values; `None` means "not provided here".
///
/// The primary layer is tagged [`ValueSource::Secret`], the fallback
/// [`ValueSource::Environment`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct PartialConnection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl PartialConnection {
    pub fn from_env(env: &Environment) -> Self {
        let port = match env.parse::<u16>(env::DB_PORT) {
            Ok(Some(0)) => {
                tracing::warn!("ignoring DB_PORT=0");
                None
            }
            Ok(port) => port,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring invalid DB_PORT");
                None
            }
        };

        Self {
            host: env.get_owned(env::DB_HOST),
            port,
            user: env.get_owned(env::DB_USER),
            password: env.get_owned(env::DB_PWD),
            database: env.get_owned(env::DB_DATABASE),
        }
    }
}

fn pick<T>(
    primary: Option<T>,
    fallback: Option<T>,
    default: impl FnOnce() -> T,
) -> (T, ValueSource) {
    match (primary, fallback) {
        (Some(v), _) => (v, ValueSource::Secret),
        (None, Some(v)) => (v, ValueSource::Environment),
        (None, None) => (default(), ValueSource::Default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_every_field() {
        let config = ConnectionConfig::from_env(&Environment::default());
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.user, "postgres");
        assert_eq!(config.database, "postgres");
        assert!(!config.has_password());
        assert_eq!(config.sources.host, ValueSource::Default);
    }

    #[test]
    fn precedence_is_per_field() {
        let primary = PartialConnection {
            host: Some("secret-host".into()),
            ..Default::default()
        };
        let fallback = PartialConnection {
            host: Some("env-host".into()),
            user: Some("env-user".into()),
            ..Default::default()
        };

        let config = ConnectionConfig::layered(primary, fallback);
        assert_eq!(config.host, "secret-host");
        assert_eq!(config.sources.host, ValueSource::Secret);
        assert_eq!(config.user, "env-user");
        assert_eq!(config.sources.user, ValueSource::Environment);
        assert_eq!(config.database, "postgres");
        assert_eq!(config.sources.database, ValueSource::Default);
    }

    #[test]
    fn debug_redacts_password() {
        let env = Environment::from_pairs([(env::DB_PWD, "hunter2")]);
        let config = ConnectionConfig::from_env(&env);
        assert!(config.has_password());
        assert!(!format!("{:?}", config).contains("hunter2"));
    }

    #[test]
    fn invalid_port_falls_back_to_default() {
        for raw in ["not-a-port", "0"] {
            let env = Environment::from_pairs([(env::DB_PORT, raw)]);
            let config = ConnectionConfig::from_env(&env);
            assert_eq!(config.port, DEFAULT_PORT);
            assert_eq!(config.sources.port, ValueSource::Default);
        }
    }
}
