//! Process-local read-through cache for catalog queries.
//!
//! Entries expire passively after their TTL and are never invalidated:
//! writes go to the store only, and readers accept up to one TTL of
//! staleness. Concurrent misses on the same key each run their own
//! computation and the last writer wins.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, warn};

use modhub_core::config::cache::QueryCacheConfig;
use modhub_entity::version::Version;

use crate::expiry::{Expiring, PerEntryTtl};

/// Result shapes the catalog caches.
#[derive(Debug, Clone)]
pub enum CachedValue {
    /// A single version.
    Version(Arc<Version>),
    /// A list of versions.
    Versions(Arc<Vec<Version>>),
    /// A row count.
    Count(i64),
}

/// A query result that can be stored in the [`QueryCache`].
///
/// `to_cached` returning `None` means the result is not cached.
pub trait Cacheable: Sized {
    /// Extract a typed result from a cache entry.
    fn from_cached(value: &CachedValue) -> Option<Self>;
    /// Convert into a cache entry, or `None` to skip caching.
    fn to_cached(&self) -> Option<CachedValue>;
}

impl Cacheable for Option<Arc<Version>> {
    fn from_cached(value: &CachedValue) -> Option<Self> {
        match value {
            CachedValue::Version(v) => Some(Some(Arc::clone(v))),
            _ => None,
        }
    }

    fn to_cached(&self) -> Option<CachedValue> {
        self.as_ref().map(|v| CachedValue::Version(Arc::clone(v)))
    }
}

impl Cacheable for Arc<Vec<Version>> {
    fn from_cached(value: &CachedValue) -> Option<Self> {
        match value {
            CachedValue::Versions(v) => Some(Arc::clone(v)),
            _ => None,
        }
    }

    fn to_cached(&self) -> Option<CachedValue> {
        Some(CachedValue::Versions(Arc::clone(self)))
    }
}

impl Cacheable for Option<Arc<Vec<Version>>> {
    fn from_cached(value: &CachedValue) -> Option<Self> {
        match value {
            CachedValue::Versions(v) => Some(Some(Arc::clone(v))),
            _ => None,
        }
    }

    fn to_cached(&self) -> Option<CachedValue> {
        self.as_ref().map(|v| CachedValue::Versions(Arc::clone(v)))
    }
}

impl Cacheable for i64 {
    fn from_cached(value: &CachedValue) -> Option<Self> {
        match value {
            CachedValue::Count(n) => Some(*n),
            _ => None,
        }
    }

    fn to_cached(&self) -> Option<CachedValue> {
        Some(CachedValue::Count(*self))
    }
}

/// Read-through cache keyed by strings from [`crate::keys`].
#[derive(Debug, Clone)]
pub struct QueryCache {
    cache: Cache<String, Expiring<CachedValue>>,
    ttl: Duration,
}

impl QueryCache {
    /// Create a cache from configuration.
    pub fn new(config: &QueryCacheConfig) -> Self {
        Self::with_capacity(config.max_capacity, config.ttl())
    }

    /// Create a cache with an explicit capacity and default TTL.
    pub fn with_capacity(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache, ttl }
    }

    /// Default TTL applied by [`QueryCache::get_or_compute`].
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the unexpired entry under `key`, if any.
    pub async fn get(&self, key: &str) -> Option<CachedValue> {
        self.cache.get(key).await.map(|entry| entry.value)
    }

    /// Store a value under `key`, replacing any previous entry.
    pub async fn insert(&self, key: String, value: CachedValue, ttl: Duration) {
        self.cache.insert(key, Expiring::new(value, ttl)).await;
    }

    /// Read through the cache with the default TTL.
    pub async fn get_or_compute<T, E, F, Fut>(&self, key: String, compute: F) -> Result<T, E>
    where
        T: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.get_or_compute_with_ttl(key, self.ttl, compute).await
    }

    /// Return the cached value for `key`, or run `compute` and cache its
    /// result for `ttl`. Errors are returned and never cached.
    pub async fn get_or_compute_with_ttl<T, E, F, Fut>(
        &self,
        key: String,
        ttl: Duration,
        compute: F,
    ) -> Result<T, E>
    where
        T: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(entry) = self.cache.get(&key).await {
            match T::from_cached(&entry.value) {
                Some(hit) => {
                    debug!(key = %key, "Query cache hit");
                    return Ok(hit);
                }
                None => warn!(key = %key, "Query cache entry has unexpected shape, recomputing"),
            }
        } else {
            debug!(key = %key, "Query cache miss");
        }

        let value = compute().await?;

        if let Some(cached) = value.to_cached() {
            self.insert(key, cached, ttl).await;
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache(ttl_ms: u64) -> QueryCache {
        QueryCache::with_capacity(100, Duration::from_millis(ttl_ms))
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let cache = cache(60_000);
        let calls = AtomicUsize::new(0);
        let calls = &calls;

        for _ in 0..3 {
            let n: Result<i64, ()> = cache
                .get_or_compute("count".to_string(), || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await;
            assert_eq!(n, Ok(7));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = cache(50);
        let calls = AtomicUsize::new(0);
        let calls = &calls;
        let compute = || async move {
            Ok::<i64, ()>(calls.fetch_add(1, Ordering::SeqCst) as i64)
        };

        assert_eq!(cache.get_or_compute("k".to_string(), compute).await, Ok(0));
        assert_eq!(cache.get_or_compute("k".to_string(), compute).await, Ok(0));

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.get("k").await.is_none());
        assert_eq!(cache.get_or_compute("k".to_string(), compute).await, Ok(1));
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = cache(60_000);

        let failed: Result<i64, &str> = cache
            .get_or_compute("k".to_string(), || async { Err("store down") })
            .await;
        assert_eq!(failed, Err("store down"));
        assert!(cache.get("k").await.is_none());

        let ok: Result<i64, &str> = cache
            .get_or_compute("k".to_string(), || async { Ok(3) })
            .await;
        assert_eq!(ok, Ok(3));
    }

    #[tokio::test]
    async fn test_missing_rows_are_not_cached() {
        let cache = cache(60_000);

        let missing: Result<Option<Arc<Version>>, ()> = cache
            .get_or_compute("v".to_string(), || async { Ok(None) })
            .await;
        assert_eq!(missing, Ok(None));
        assert!(cache.get("v").await.is_none());

        let batch: Result<Option<Arc<Vec<Version>>>, ()> = cache
            .get_or_compute("ids".to_string(), || async { Ok(None) })
            .await;
        assert!(batch.unwrap().is_none());
        assert!(cache.get("ids").await.is_none());
    }

    #[tokio::test]
    async fn test_empty_lists_are_cached() {
        let cache = cache(60_000);
        let _: Result<Arc<Vec<Version>>, ()> = cache
            .get_or_compute("list".to_string(), || async { Ok(Arc::new(Vec::new())) })
            .await;
        assert!(matches!(
            cache.get("list").await,
            Some(CachedValue::Versions(v)) if v.is_empty()
        ));
    }

    #[tokio::test]
    async fn test_cancelled_compute_leaves_no_entry() {
        let cache = cache(60_000);

        let outcome = tokio::time::timeout(
            Duration::from_millis(20),
            cache.get_or_compute("slow".to_string(), || async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<i64, ()>(1)
            }),
        )
        .await;

        assert!(outcome.is_err());
        assert!(cache.get("slow").await.is_none());
    }

    #[tokio::test]
    async fn test_mismatched_shape_is_recomputed() {
        let cache = cache(60_000);
        cache
            .insert("k".to_string(), CachedValue::Count(1), Duration::from_secs(60))
            .await;

        let list: Result<Arc<Vec<Version>>, ()> = cache
            .get_or_compute("k".to_string(), || async { Ok(Arc::new(Vec::new())) })
            .await;
        assert!(list.unwrap().is_empty());
        assert!(matches!(cache.get("k").await, Some(CachedValue::Versions(_))));
    }
}
