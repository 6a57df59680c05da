//! AWS Secrets Manager client
//!
//! Region-scoped; credentials come from the default AWS provider chain
//! (environment, profile, instance role).

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::Client;

use crate::error::SecretError;
use crate::secret::{SecretPayload, SecretSource};

/// [`SecretSource`] backed by AWS Secrets Manager
#[derive(Debug, Clone)]
pub struct AwsSecretSource {
    client: Client,
    region: String,
}

impl AwsSecretSource {
    /// Build a client for `region` using the default credential chain.
    pub async fn from_region(region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_owned()))
            .load()
            .await;

        Self {
            client: Client::new(&config),
            region: region.to_owned(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl SecretSource for AwsSecretSource {
    async fn get_secret(&self, secret_id: &str) -> Result<SecretPayload, SecretError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| SecretError::fetch(secret_id, DisplayErrorContext(&e).to_string()))?;

        if let Some(text) = output.secret_string() {
            return Ok(SecretPayload::Text(text.to_owned()));
        }
        if let Some(blob) = output.secret_binary() {
            return Ok(SecretPayload::Binary(blob.as_ref().to_vec()));
        }

        Err(SecretError::Empty {
            secret_id: secret_id.to_owned(),
        })
    }
}
