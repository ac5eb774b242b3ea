//! Blob storage configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Link provider to use: `"s3"` or `"local"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Lifetime of generated download links in seconds.
    #[serde(default = "default_link_ttl")]
    pub link_ttl_seconds: u64,
    /// S3-compatible storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
    /// Local (static file server) configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
}

impl StorageConfig {
    /// Link lifetime as a [`Duration`].
    pub fn link_ttl(&self) -> Duration {
        Duration::from_secs(self.link_ttl_seconds)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            link_ttl_seconds: default_link_ttl(),
            s3: S3StorageConfig::default(),
            local: LocalStorageConfig::default(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO). Empty uses AWS.
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// S3 bucket name.
    #[serde(default)]
    pub bucket: String,
    /// Access key ID. Empty falls back to the default credential chain.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Use path-style addressing (required by most self-hosted stores).
    #[serde(default)]
    pub force_path_style: bool,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            bucket: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            force_path_style: false,
        }
    }
}

/// Local storage configuration: objects are served by a static file server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Base URL that object keys are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_link_ttl() -> u64 {
    900
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080/files".to_string()
}
