//! Download limiter built on the limiter store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use modhub_core::result::AppResult;
use modhub_core::traits::cache::CacheProvider;
use modhub_core::traits::limiter::DownloadLimiter;

use crate::keys;

/// Admits each `(identity, scope)` pair once per window using `SET NX`.
#[derive(Debug, Clone)]
pub struct CacheDownloadLimiter {
    store: Arc<dyn CacheProvider>,
}

impl CacheDownloadLimiter {
    /// Create a limiter over the given store.
    pub fn new(store: Arc<dyn CacheProvider>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DownloadLimiter for CacheDownloadLimiter {
    async fn try_admit(&self, identity: &str, scope: &str, window: Duration) -> AppResult<bool> {
        self.store
            .set_nx(&keys::rate_limit(scope, identity), "1", window)
            .await
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use crate::memory::MemoryCacheProvider;
    use modhub_core::config::cache::MemoryCacheConfig;

    fn limiter() -> CacheDownloadLimiter {
        CacheDownloadLimiter::new(Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig {
            max_capacity: 100,
        })))
    }

    #[tokio::test]
    async fn test_pair_is_admitted_once_per_window() {
        let limiter = limiter();
        let window = Duration::from_secs(60);

        assert!(limiter.try_admit("10.0.0.1", "download:v1", window).await.unwrap());
        assert!(!limiter.try_admit("10.0.0.1", "download:v1", window).await.unwrap());
        assert!(limiter.try_admit("10.0.0.2", "download:v1", window).await.unwrap());
        assert!(limiter.try_admit("10.0.0.1", "download:v2", window).await.unwrap());
    }

    #[tokio::test]
    async fn test_pair_is_admitted_again_after_window() {
        let limiter = limiter();
        let window = Duration::from_millis(50);

        assert!(limiter.try_admit("c", "download:v1", window).await.unwrap());
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(limiter.try_admit("c", "download:v1", window).await.unwrap());
    }
}
