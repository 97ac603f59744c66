//! Backend configuration.
//!
//! A [`BackendConfig`] describes one storage medium declaratively, so
//! deployments can switch between local disk and object stores without
//! code changes. Configurations load from TOML and build directly into
//! a ready [`Filesystem`].

use serde::{Deserialize, Serialize};

use crate::backend::{LocalBackend, ObjectStoreBackend};
use crate::error::{Error, Result};
use crate::filesystem::Filesystem;

/// Declarative description of a storage backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    S3 {
        bucket: String,
        region: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        access_key_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        secret_access_key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
    },
    Gcs {
        bucket: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        service_account_path: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
    },
    Local {
        root: String,
    },
    Memory {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
    },
}

impl BackendConfig {
    /// Loads a configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", path, e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file {}: {}", path, e)))
    }

    /// Builds the filesystem this configuration describes.
    pub fn build(self) -> Result<Filesystem> {
        match self {
            BackendConfig::S3 {
                bucket,
                region,
                access_key_id,
                secret_access_key,
                endpoint,
                prefix,
            } => {
                let backend = ObjectStoreBackend::s3(
                    &bucket,
                    &region,
                    access_key_id.as_deref(),
                    secret_access_key.as_deref(),
                    endpoint.as_deref(),
                )?;
                Ok(Filesystem::new(backend, prefix.as_deref().unwrap_or("")))
            }
            BackendConfig::Gcs {
                bucket,
                service_account_path,
                prefix,
            } => {
                let backend = ObjectStoreBackend::gcs(&bucket, service_account_path.as_deref())?;
                Ok(Filesystem::new(backend, prefix.as_deref().unwrap_or("")))
            }
            BackendConfig::Local { root } => Ok(Filesystem::new(LocalBackend::new(), &root)),
            BackendConfig::Memory { prefix } => Ok(Filesystem::new(
                ObjectStoreBackend::memory(),
                prefix.as_deref().unwrap_or(""),
            )),
        }
    }
}
