//! Version handlers not scoped to a single mod.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use modhub_entity::version::{Version, VersionDependency};

use crate::dto::response::{ApiResponse, CountResponse, project_versions};
use crate::error::ApiError;
use crate::extractors::{CatalogContext, FilterParams, IdsParams};
use crate::state::AppState;

/// GET /v1/versions
pub async fn list_versions(
    State(state): State<AppState>,
    ctx: CatalogContext,
    Query(params): Query<FilterParams>,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, ApiError> {
    let filter = params.to_filter();
    let versions = state
        .catalog
        .list_versions(Some(&filter), ctx.include_unapproved(params.unapproved))
        .await?;
    Ok(Json(ApiResponse::ok(project_versions(
        &versions,
        &params.projection(),
    )?)))
}

/// GET /v1/versions/count
pub async fn count_versions(
    State(state): State<AppState>,
    ctx: CatalogContext,
    Query(params): Query<FilterParams>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let filter = params.to_filter();
    let count = state
        .catalog
        .count_versions(Some(&filter), ctx.include_unapproved(params.unapproved))
        .await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// GET /v1/versions/by-ids?ids=a,b
///
/// 404 unless every id exists.
pub async fn list_versions_by_ids(
    State(state): State<AppState>,
    Query(params): Query<IdsParams>,
) -> Result<Json<ApiResponse<Vec<Version>>>, ApiError> {
    let versions = state
        .catalog
        .list_versions_by_ids(&params.ids())
        .await?
        .ok_or_else(ApiError::not_found)?;
    Ok(Json(ApiResponse::ok(versions.as_ref().clone())))
}

/// GET /v1/version/{id}
pub async fn get_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Version>>, ApiError> {
    let version = state
        .catalog
        .get_version(&id)
        .await?
        .ok_or_else(ApiError::not_found)?;
    Ok(Json(ApiResponse::ok(version.as_ref().clone())))
}

/// GET /v1/version/{id}/dependencies
pub async fn list_dependencies(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<VersionDependency>>>, ApiError> {
    let dependencies = state.catalog.list_dependencies(&id).await?;
    Ok(Json(ApiResponse::ok(dependencies)))
}

/// GET /v1/version/{id}/download
///
/// Redirects to the archive and counts the download once per client and
/// window.
pub async fn download_version(
    State(state): State<AppState>,
    ctx: CatalogContext,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let url = state
        .downloads
        .record_download(&ctx.client_identity, &id)
        .await?;
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}
