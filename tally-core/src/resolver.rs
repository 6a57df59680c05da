//! Cascading credential resolution
//!
//! Order per field: secret store, then environment, then default.
//! A failed secret lookup (fetch or decode) is logged and resolution
//! continues with the environment; `resolve` itself never fails.
//! There are no retries.

use std::sync::Arc;

use tracing::{error, info};

use crate::connection::{ConnectionConfig, PartialConnection};
use crate::env::Environment;
use crate::error::SecretError;
use crate::secret::{decode_credentials, SecretSource};
use crate::settings::SecretSettings;

/// Resolves a [`ConnectionConfig`] once at startup
pub struct ConfigResolver {
    env: Environment,
    settings: SecretSettings,
    source: Option<Arc<dyn SecretSource>>,
}

impl ConfigResolver {
    /// Create a resolver. Without an explicit source, an AWS client for
    /// `settings.region` is built on demand (when the `aws` feature is on).
    pub fn new(env: Environment, settings: SecretSettings) -> Self {
        Self {
            env,
            settings,
            source: None,
        }
    }

    /// Use a specific secret store client.
    pub fn with_source(mut self, source: Arc<dyn SecretSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub async fn resolve(&self) -> ConnectionConfig {
        let env_layer = PartialConnection::from_env(&self.env);

        let Some(secret_id) = self.settings.secret_id.as_deref() else {
            info!("no DB_SECRET_NAME provided, using environment variables or defaults");
            return ConnectionConfig::layered(PartialConnection::default(), env_layer);
        };

        match self.fetch(secret_id).await {
            Ok(secret_layer) => {
                info!(
                    secret_id,
                    region = %self.settings.region,
                    "database configuration loaded from secret store"
                );
                ConnectionConfig::layered(secret_layer, env_layer)
            }
            Err(e) => {
                error!(
                    secret_id,
                    error = %e,
                    "secret store lookup failed, falling back to environment"
                );
                ConnectionConfig::layered(PartialConnection::default(), env_layer)
            }
        }
    }

    async fn fetch(&self, secret_id: &str) -> Result<PartialConnection, SecretError> {
        let source = match &self.source {
            Some(source) => Arc::clone(source),
            None => self.default_source(secret_id).await?,
        };
        let payload = source.get_secret(secret_id).await?;
        decode_credentials(payload)
    }

    #[cfg(feature = "aws")]
    async fn default_source(&self, _secret_id: &str) -> Result<Arc<dyn SecretSource>, SecretError> {
        Ok(Arc::new(
            crate::aws::AwsSecretSource::from_region(&self.settings.region).await,
        ))
    }

    #[cfg(not(feature = "aws"))]
    async fn default_source(&self, secret_id: &str) -> Result<Arc<dyn SecretSource>, SecretError> {
        Err(SecretError::Unavailable {
            secret_id: secret_id.to_owned(),
        })
    }
}
