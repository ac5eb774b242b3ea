//! Local link provider: objects are served from a static base URL.

use async_trait::async_trait;

use modhub_core::error::AppError;
use modhub_core::result::AppResult;
use modhub_core::traits::storage::LinkProvider;

/// Builds download links by appending the object key to a base URL.
///
/// Links do not expire; the files are expected to sit behind a static file
/// server or CDN.
#[derive(Debug, Clone)]
pub struct LocalLinkProvider {
    base_url: String,
}

impl LocalLinkProvider {
    /// Create a provider for the given base URL.
    pub fn new(base_url: &str) -> AppResult<Self> {
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(AppError::configuration(
                "storage.local.base_url must not be empty",
            ));
        }
        Ok(Self {
            base_url: base_url.to_string(),
        })
    }
}

#[async_trait]
impl LinkProvider for LocalLinkProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn download_link(&self, key: &str) -> AppResult<String> {
        let key = key.trim_start_matches('/');
        if key.is_empty() {
            return Err(AppError::validation("Object key must not be empty"));
        }
        Ok(format!("{}/{key}", self.base_url))
    }
}
