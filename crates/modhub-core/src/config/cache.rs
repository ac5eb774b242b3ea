//! Query cache and limiter store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Limiter store provider type: `"memory"` or `"redis"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Redis-specific configuration.
    #[serde(default)]
    pub redis: RedisCacheConfig,
    /// In-memory limiter store configuration.
    #[serde(default)]
    pub memory: MemoryCacheConfig,
    /// Process-local read-through query cache.
    #[serde(default)]
    pub query: QueryCacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            redis: RedisCacheConfig::default(),
            memory: MemoryCacheConfig::default(),
            query: QueryCacheConfig::default(),
        }
    }
}

/// Redis backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisCacheConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Key prefix for all ModHub keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

/// In-memory limiter store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries held.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
        }
    }
}

/// Read-through query cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryCacheConfig {
    /// Maximum number of cached query results.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// Lifetime of each cached result in seconds.
    #[serde(default = "default_query_ttl")]
    pub ttl_seconds: u64,
}

impl QueryCacheConfig {
    /// TTL as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl Default for QueryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            ttl_seconds: default_query_ttl(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "modhub:".to_string()
}

fn default_max_capacity() -> u64 {
    10000
}

fn default_query_ttl() -> u64 {
    300
}
