//! ModHub Server: version catalog for mod releases.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use modhub_api::AppState;
use modhub_cache::{CacheDownloadLimiter, CacheManager, QueryCache};
use modhub_core::config::AppConfig;
use modhub_core::error::AppError;
use modhub_core::traits::cache::CacheProvider;
use modhub_database::{DatabasePool, VersionRepository, VersionStore};
use modhub_service::{CatalogService, DownloadService};
use modhub_storage::LinkManager;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `MODHUB_ENV` overlay, and `MODHUB__*`
/// environment variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("MODHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ModHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    let store: Arc<dyn VersionStore> = Arc::new(VersionRepository::new(db.pool().clone()));

    // ── Step 2: Limiter store ────────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing limiter store");
    let limiter_store: Arc<dyn CacheProvider> = Arc::new(CacheManager::new(&config.cache).await?);

    // ── Step 3: Link provider ────────────────────────────────────
    let links = Arc::new(LinkManager::from_config(&config.storage).await?);

    // ── Step 4: Query cache + services ───────────────────────────
    let query_cache = Arc::new(QueryCache::new(&config.cache.query));
    tracing::info!(
        max_capacity = config.cache.query.max_capacity,
        ttl_secs = config.cache.query.ttl_seconds,
        "Query cache ready"
    );

    let catalog = CatalogService::new(Arc::clone(&store), query_cache, &config.catalog);
    let downloads = DownloadService::new(
        catalog.clone(),
        store,
        Arc::new(CacheDownloadLimiter::new(Arc::clone(&limiter_store))),
        links,
        &config.catalog,
    );

    // ── Step 5: Serve ────────────────────────────────────────────
    let state = AppState {
        config: Arc::new(config),
        limiter_store,
        catalog,
        downloads,
    };

    let result = modhub_api::run_server(state).await;

    db.close().await;
    tracing::info!("Database pool closed");

    result
}
