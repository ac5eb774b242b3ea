//! Redis limiter store provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use modhub_core::error::{AppError, ErrorKind};
use modhub_core::result::AppResult;
use modhub_core::traits::cache::CacheProvider;

use super::client::RedisClient;

/// Redis-backed limiter store.
#[derive(Debug, Clone)]
pub struct RedisCacheProvider {
    client: RedisClient,
}

impl RedisCacheProvider {
    /// Create a new Redis provider.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();

        // SET key value PX ttl NX
        let result: Option<String> = redis::cmd("SET")
            .arg(&full_key)
            .arg(value)
            .arg("PX")
            .arg(ttl.as_millis().max(1) as u64)
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        debug!(key = %full_key, admitted = result.is_some(), "SET NX");
        Ok(result.is_some())
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
