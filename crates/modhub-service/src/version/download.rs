//! Download recording: redirect always, count at most once per window.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use modhub_core::config::CatalogConfig;
use modhub_core::traits::limiter::DownloadLimiter;
use modhub_core::traits::storage::LinkProvider;
use modhub_database::VersionStore;

use crate::error::{CatalogError, CatalogResult};
use crate::version::catalog::CatalogService;

/// Resolves download links and counts downloads.
#[derive(Debug, Clone)]
pub struct DownloadService {
    catalog: CatalogService,
    store: Arc<dyn VersionStore>,
    limiter: Arc<dyn DownloadLimiter>,
    links: Arc<dyn LinkProvider>,
    window: Duration,
}

impl DownloadService {
    /// Creates a new download service.
    pub fn new(
        catalog: CatalogService,
        store: Arc<dyn VersionStore>,
        limiter: Arc<dyn DownloadLimiter>,
        links: Arc<dyn LinkProvider>,
        config: &CatalogConfig,
    ) -> Self {
        Self {
            catalog,
            store,
            limiter,
            links,
            window: config.download_window(),
        }
    }

    /// Returns the download URL for a version and counts the download if
    /// the client has not downloaded it within the window.
    ///
    /// Counting is best effort: limiter and store failures are logged and
    /// never affect the returned URL.
    pub async fn record_download(
        &self,
        client_identity: &str,
        version_id: &str,
    ) -> CatalogResult<String> {
        let version = self
            .catalog
            .get_version(version_id)
            .await?
            .ok_or(CatalogError::NotFound)?;

        let url = self.links.download_link(&version.object_key).await?;

        let scope = format!("download:{version_id}");
        match self
            .limiter
            .try_admit(client_identity, &scope, self.window)
            .await
        {
            Ok(true) => match self.store.increment_downloads(version_id).await {
                Ok(true) => debug!(version_id, "Download counted"),
                Ok(false) => warn!(version_id, "Download not counted: version vanished"),
                Err(e) => warn!(version_id, error = %e, "Download not counted"),
            },
            Ok(false) => debug!(version_id, "Repeat download within window, not counted"),
            Err(e) => warn!(version_id, error = %e, "Download limiter unavailable, not counted"),
        }

        Ok(url)
    }
}
