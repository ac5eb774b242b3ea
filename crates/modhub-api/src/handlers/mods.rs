//! Mod-scoped version handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use modhub_entity::version::Version;

use crate::dto::request::CreateVersionRequest;
use crate::dto::response::{ApiResponse, project_versions};
use crate::error::ApiError;
use crate::extractors::{CatalogContext, FilterParams, IdsParams};
use crate::state::AppState;

/// GET /v1/mod/{mod_id}/versions
pub async fn list_mod_versions(
    State(state): State<AppState>,
    ctx: CatalogContext,
    Path(mod_id): Path<String>,
    Query(params): Query<FilterParams>,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, ApiError> {
    let filter = params.to_filter();
    let versions = state
        .catalog
        .list_mod_versions(
            &mod_id,
            Some(&filter),
            ctx.include_unapproved(params.unapproved),
        )
        .await?;
    Ok(Json(ApiResponse::ok(project_versions(
        &versions,
        &params.projection(),
    )?)))
}

/// POST /v1/mod/{mod_id}/versions
pub async fn create_version(
    State(state): State<AppState>,
    Path(mod_id): Path<String>,
    Json(body): Json<CreateVersionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Version>>), ApiError> {
    body.validate()?;
    let version = state
        .catalog
        .create_version(body.into_draft(&mod_id))
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(version))))
}

/// GET /v1/mod/{mod_id}/versions/latest
pub async fn list_latest_versions(
    State(state): State<AppState>,
    ctx: CatalogContext,
    Path(mod_id): Path<String>,
    Query(params): Query<FilterParams>,
) -> Result<Json<ApiResponse<Vec<Version>>>, ApiError> {
    let versions = state
        .catalog
        .list_latest_versions(&mod_id, ctx.include_unapproved(params.unapproved))
        .await?;
    Ok(Json(ApiResponse::ok(versions.as_ref().clone())))
}

/// GET /v1/mods/latest-versions?ids=a,b
pub async fn list_latest_versions_for_mods(
    State(state): State<AppState>,
    ctx: CatalogContext,
    Query(params): Query<IdsParams>,
) -> Result<Json<ApiResponse<Vec<Version>>>, ApiError> {
    let versions = state
        .catalog
        .list_latest_versions_for_mods(&params.ids(), ctx.include_unapproved(params.unapproved))
        .await?;
    Ok(Json(ApiResponse::ok(versions.as_ref().clone())))
}

/// GET /v1/mod/{mod_id}/version/{version_id}
pub async fn get_mod_version(
    State(state): State<AppState>,
    Path((mod_id, version_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Version>>, ApiError> {
    let version = state
        .catalog
        .get_mod_version(&mod_id, &version_id)
        .await?
        .ok_or_else(ApiError::not_found)?;
    Ok(Json(ApiResponse::ok(version.as_ref().clone())))
}

/// GET /v1/mod/{mod_id}/version-name/{name}
pub async fn get_version_by_name(
    State(state): State<AppState>,
    Path((mod_id, name)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Version>>, ApiError> {
    let version = state
        .catalog
        .get_version_by_name(&mod_id, &name)
        .await?
        .ok_or_else(ApiError::not_found)?;
    Ok(Json(ApiResponse::ok(version.as_ref().clone())))
}
