//! Route definitions for the ModHub HTTP API.
//!
//! Catalog routes are mounted under `/v1`; the health check sits at the
//! root. The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::Router;
use axum::routing::get;

use crate::handlers;
use crate::state::AppState;

/// Build the route table with state applied.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/v1", version_routes().merge(mod_routes()))
        .route("/health", get(handlers::health::health))
        .with_state(state)
}

/// Version lookups, listings, counts, and downloads
fn version_routes() -> Router<AppState> {
    Router::new()
        .route("/versions", get(handlers::versions::list_versions))
        .route("/versions/count", get(handlers::versions::count_versions))
        .route(
            "/versions/by-ids",
            get(handlers::versions::list_versions_by_ids),
        )
        .route("/version/{id}", get(handlers::versions::get_version))
        .route(
            "/version/{id}/dependencies",
            get(handlers::versions::list_dependencies),
        )
        .route(
            "/version/{id}/download",
            get(handlers::versions::download_version),
        )
}

/// Mod-scoped version endpoints
fn mod_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/mod/{mod_id}/versions",
            get(handlers::mods::list_mod_versions).post(handlers::mods::create_version),
        )
        .route(
            "/mod/{mod_id}/versions/latest",
            get(handlers::mods::list_latest_versions),
        )
        .route(
            "/mod/{mod_id}/version/{version_id}",
            get(handlers::mods::get_mod_version),
        )
        .route(
            "/mod/{mod_id}/version-name/{name}",
            get(handlers::mods::get_version_by_name),
        )
        .route(
            "/mods/latest-versions",
            get(handlers::mods::list_latest_versions_for_mods),
        )
}
