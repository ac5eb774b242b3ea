//! Link manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use modhub_core::config::StorageConfig;
use modhub_core::error::AppError;
use modhub_core::result::AppResult;
use modhub_core::traits::storage::LinkProvider;

/// Wraps the link provider selected by `storage.provider`.
#[derive(Debug, Clone)]
pub struct LinkManager {
    inner: Arc<dyn LinkProvider>,
}

impl LinkManager {
    /// Build the configured provider.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let inner: Arc<dyn LinkProvider> = match config.provider.as_str() {
            #[cfg(feature = "s3")]
            "s3" => Arc::new(
                crate::providers::S3LinkProvider::new(&config.s3, config.link_ttl()).await?,
            ),
            #[cfg(feature = "local")]
            "local" => Arc::new(crate::providers::LocalLinkProvider::new(
                &config.local.base_url,
            )?),
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown storage provider: '{other}'. Supported: local, s3"
                )));
            }
        };

        info!(provider = inner.provider_type(), "Link provider ready");
        Ok(Self { inner })
    }

    /// Wrap an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn LinkProvider>) -> Self {
        Self { inner: provider }
    }
}

#[async_trait]
impl LinkProvider for LinkManager {
    fn provider_type(&self) -> &str {
        self.inner.provider_type()
    }

    async fn download_link(&self, key: &str) -> AppResult<String> {
        self.inner.download_link(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_config_uses_local_provider() {
        let manager = LinkManager::from_config(&StorageConfig::default())
            .await
            .unwrap();
        assert_eq!(manager.provider_type(), "local");
        assert_eq!(
            manager.download_link("m/1.zip").await.unwrap(),
            "http://localhost:8080/files/m/1.zip"
        );
    }

    #[tokio::test]
    async fn test_unknown_provider_is_rejected() {
        let config = StorageConfig {
            provider: "ftp".to_string(),
            ..StorageConfig::default()
        };
        assert!(LinkManager::from_config(&config).await.is_err());
    }
}
