//! In-memory limiter store using the moka crate.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use modhub_core::config::cache::MemoryCacheConfig;
use modhub_core::result::AppResult;
use modhub_core::traits::cache::CacheProvider;

use crate::expiry::{Expiring, PerEntryTtl};

/// In-memory limiter store provider using moka.
///
/// Suitable for single-node deployments only: admissions are not shared
/// across processes.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    cache: Cache<String, Expiring<String>>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory store from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        // The entry API runs the initializer for at most one caller per key.
        let entry = self
            .cache
            .entry(key.to_string())
            .or_insert_with(async { Expiring::new(value.to_string(), ttl) })
            .await;
        Ok(entry.is_fresh())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn provider() -> MemoryCacheProvider {
        MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 100 })
    }

    #[tokio::test]
    async fn test_set_nx_admits_once() {
        let store = provider();
        let ttl = Duration::from_secs(60);
        assert!(store.set_nx("k", "1", ttl).await.unwrap());
        assert!(!store.set_nx("k", "1", ttl).await.unwrap());
        assert!(store.set_nx("other", "1", ttl).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_nx_admits_again_after_expiry() {
        let store = provider();
        let ttl = Duration::from_millis(50);
        assert!(store.set_nx("k", "1", ttl).await.unwrap());
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(store.set_nx("k", "1", ttl).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_set_nx_has_one_winner() {
        let store = Arc::new(provider());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .set_nx("race", "1", Duration::from_secs(60))
                    .await
                    .unwrap()
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
    }
}
