//! Environment snapshot
//!
//! The process environment is captured once into an [`Environment`] and
//! passed around by value. Resolution code never calls `std::env::var`
//! directly, so tests can supply their own variables.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::ConfigError;

pub const DB_SECRET_NAME: &str = "DB_SECRET_NAME";
pub const AWS_REGION: &str = "AWS_REGION";
pub const DB_HOST: &str = "DB_HOST";
pub const DB_PORT: &str = "DB_PORT";
pub const DB_USER: &str = "DB_USER";
pub const DB_PWD: &str = "DB_PWD";
pub const DB_DATABASE: &str = "DB_DATABASE";
pub const DB_POOL_SIZE: &str = "DB_POOL_SIZE";
pub const DB_POOL_QUEUE_LIMIT: &str = "DB_POOL_QUEUE_LIMIT";
pub const DB_ACQUIRE_TIMEOUT_SECS: &str = "DB_ACQUIRE_TIMEOUT_SECS";
pub const DB_STATEMENT_TIMEOUT_SECS: &str = "DB_STATEMENT_TIMEOUT_SECS";
pub const HOST: &str = "HOST";
pub const PORT: &str = "PORT";

/// Immutable key/value snapshot of environment variables
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Capture the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn capture() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    /// Build an environment from explicit pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Get a variable. Empty values are treated as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Get a variable as an owned string. Empty values are treated as unset.
    pub fn get_owned(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_owned)
    }

    /// Parse a variable, returning `Ok(None)` when it is unset.
    pub fn parse<T>(&self, key: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| ConfigError::invalid_value(key, raw, e.to_string())),
        }
    }
}
