//! Per-entry TTL policy for moka caches.

use std::time::{Duration, Instant};

use moka::Expiry;

/// A cached value paired with its own lifetime.
#[derive(Debug, Clone)]
pub struct Expiring<V> {
    /// The stored value.
    pub value: V,
    /// How long the value lives after insertion.
    pub ttl: Duration,
}

impl<V> Expiring<V> {
    /// Wrap a value with a TTL.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self { value, ttl }
    }
}

/// Expires each entry `ttl` after it was written. Reads never extend it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerEntryTtl;

impl<K, V> Expiry<K, Expiring<V>> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &K,
        value: &Expiring<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &K,
        value: &Expiring<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}
