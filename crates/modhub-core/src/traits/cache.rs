//! Cache provider trait for the short-window limiter store.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for shared key-value backends (Redis or in-memory).
///
/// The provider is responsible for key prefixing and TTL enforcement.
/// Only the atomic primitives the limiter needs are exposed.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Set a value only if the key does not already exist (NX), expiring
    /// after `ttl`. Returns `true` if the value was set, `false` if the key
    /// already existed.
    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool>;

    /// Check that the cache backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
