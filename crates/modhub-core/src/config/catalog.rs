//! Catalog quota and download-window configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Limits applied by the version catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Maximum versions a mod may create inside one rolling window.
    #[serde(default = "default_creation_quota")]
    pub creation_quota: u32,
    /// Length of the rolling creation window in hours.
    #[serde(default = "default_creation_window_hours")]
    pub creation_window_hours: u32,
    /// Window in which repeated downloads from one client count once.
    #[serde(default = "default_download_window")]
    pub download_window_seconds: u64,
}

impl CatalogConfig {
    /// Rolling creation window.
    pub fn creation_window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.creation_window_hours))
    }

    /// Download de-duplication window.
    pub fn download_window(&self) -> Duration {
        Duration::from_secs(self.download_window_seconds)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            creation_quota: default_creation_quota(),
            creation_window_hours: default_creation_window_hours(),
            download_window_seconds: default_download_window(),
        }
    }
}

fn default_creation_quota() -> u32 {
    5
}

fn default_creation_window_hours() -> u32 {
    24
}

fn default_download_window() -> u64 {
    4 * 60 * 60
}
