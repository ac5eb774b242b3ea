//! Blob store link generation.

use async_trait::async_trait;

use crate::result::AppResult;

/// Produces time-limited download URLs for stored objects.
///
/// Implementations have no side effects; the URL is a function of the
/// object key and the signing time.
#[async_trait]
pub trait LinkProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "s3", "local").
    fn provider_type(&self) -> &str;

    /// Generate a download URL for the object stored under `key`.
    async fn download_link(&self, key: &str) -> AppResult<String>;
}
