//! Structured error types for tally-core.
//!
//! Secret-store failures never reach callers of
//! [`ConfigResolver::resolve`](crate::ConfigResolver::resolve); they are
//! logged and absorbed into the environment fallback. Settings errors are
//! surfaced so the binary can refuse to start with a clear message.

use thiserror::Error;

/// Invalid service settings (bad numeric values, unparsable bind address)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid_value(
        key: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Failure to fetch or decode database credentials from the secret store
#[derive(Error, Debug)]
pub enum SecretError {
    /// The secret store call itself failed (network, permissions, unknown id)
    #[error("Failed to fetch secret '{secret_id}': {message}")]
    Fetch { secret_id: String, message: String },

    /// The secret exists but carries neither text nor binary content
    #[error("Secret '{secret_id}' has no value")]
    Empty { secret_id: String },

    /// No secret store client is available in this build
    #[error("No secret store client available for secret '{secret_id}'")]
    Unavailable { secret_id: String },

    /// Binary content could not be turned into text
    #[error("Failed to decode secret payload: {reason}")]
    Decode { reason: String },

    /// Payload text is not JSON
    #[error("Secret payload is not valid JSON: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Payload is JSON but not an object
    #[error("Secret payload must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}

impl SecretError {
    /// Create a fetch error
    pub fn fetch(secret_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            secret_id: secret_id.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }
}
