//! Limiter store manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use modhub_core::config::cache::CacheConfig;
use modhub_core::error::AppError;
use modhub_core::result::AppResult;
use modhub_core::traits::cache::CacheProvider;

/// Limiter store manager that wraps the configured provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct CacheManager {
    inner: Arc<dyn CacheProvider>,
}

impl CacheManager {
    /// Create a new cache manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn CacheProvider> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis limiter store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisCacheProvider::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!(
                    max_capacity = config.memory.max_capacity,
                    "Initializing in-memory limiter store"
                );
                Arc::new(crate::memory::MemoryCacheProvider::new(&config.memory))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a cache manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn CacheProvider>) -> Self {
        Self { inner: provider }
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        self.inner.set_nx(key, value, ttl).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_provider_is_rejected() {
        let config = CacheConfig {
            provider: "memcached".to_string(),
            ..CacheConfig::default()
        };
        let err = CacheManager::new(&config).await.unwrap_err();
        assert_eq!(err.kind, modhub_core::error::ErrorKind::Configuration);
    }

    #[cfg(feature = "memory")]
    #[tokio::test]
    async fn test_memory_provider_from_config() {
        let manager = CacheManager::new(&CacheConfig::default()).await.unwrap();
        assert!(manager.health_check().await.unwrap());
        assert!(
            manager
                .set_nx("k", "1", Duration::from_secs(5))
                .await
                .unwrap()
        );
        assert!(
            !manager
                .set_nx("k", "1", Duration::from_secs(5))
                .await
                .unwrap()
        );
    }
}
