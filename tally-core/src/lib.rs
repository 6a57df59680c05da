//! tally-core: configuration for the tally transaction service
//!
//! Resolves database credentials once at startup:
//! - secret store (AWS Secrets Manager) when `DB_SECRET_NAME` is set
//! - environment variables (`DB_HOST`, `DB_USER`, ...)
//! - built-in defaults
//!
//! The result is an immutable [`ConnectionConfig`] that the pool is built from.

pub mod connection;
pub mod env;
pub mod error;
pub mod resolver;
pub mod secret;
pub mod settings;

#[cfg(feature = "aws")]
pub mod aws;

pub use connection::{ConnectionConfig, ValueSource};
pub use env::Environment;
pub use error::{ConfigError, SecretError};
pub use resolver::ConfigResolver;
pub use secret::{SecretPayload, SecretSource};
pub use settings::{PoolSettings, SecretSettings, ServiceSettings};

#[cfg(feature = "aws")]
pub use aws::AwsSecretSource;
