//! Deployment-time configuration of a protocol instance.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::DEFAULT_SERIALIZED_SIZE_LIMIT;
use crate::identity::Identity;
use crate::party::Parties;

pub const DEFAULT_DOMAIN_NAME: &str = "MillionaireYao";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolConfig {
    pub alice: Identity,
    pub bob: Identity,
    /// Name mixed into the authorization domain separator.
    #[serde(default = "default_domain_name")]
    pub domain_name: String,
    #[serde(default = "default_max_ciphertext_bytes")]
    pub max_ciphertext_bytes: u64,
}

fn default_domain_name() -> String {
    DEFAULT_DOMAIN_NAME.to_string()
}

fn default_max_ciphertext_bytes() -> u64 {
    DEFAULT_SERIALIZED_SIZE_LIMIT
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("alice and bob must be distinct identities")]
    IdenticalParties,

    #[error("domain name must not be empty")]
    EmptyDomain,

    #[error("max_ciphertext_bytes must be positive")]
    ZeroSizeLimit,
}

impl ProtocolConfig {
    pub fn new(alice: Identity, bob: Identity) -> Self {
        Self {
            alice,
            bob,
            domain_name: default_domain_name(),
            max_ciphertext_bytes: default_max_ciphertext_bytes(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain_name.trim().is_empty() {
            return Err(ConfigError::EmptyDomain);
        }
        if self.max_ciphertext_bytes == 0 {
            return Err(ConfigError::ZeroSizeLimit);
        }
        self.parties().map(|_| ())
    }

    pub fn parties(&self) -> Result<Parties, ConfigError> {
        Parties::new(self.alice, self.bob).ok_or(ConfigError::IdenticalParties)
    }
}
