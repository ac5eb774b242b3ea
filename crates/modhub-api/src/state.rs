//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use modhub_core::config::AppConfig;
use modhub_core::traits::cache::CacheProvider;
use modhub_service::{CatalogService, DownloadService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// Every field is cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Limiter store, probed by the health check
    pub limiter_store: Arc<dyn CacheProvider>,

    // ── Services ─────────────────────────────────────────────
    /// Cached catalog reads and version creation
    pub catalog: CatalogService,
    /// Download links and counting
    pub downloads: DownloadService,
}

impl AppState {
    /// Whether `token` matches the configured moderator token.
    pub fn is_moderator_token(&self, token: &str) -> bool {
        self.config
            .server
            .moderator_token
            .as_deref()
            .is_some_and(|expected| !expected.is_empty() && expected == token)
    }
}
