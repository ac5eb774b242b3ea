//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let cache = match state.limiter_store.health_check().await {
        Ok(true) => "connected",
        Ok(false) => "unavailable",
        Err(e) => {
            tracing::warn!(error = %e, "Limiter store health check failed");
            "unavailable"
        }
    };

    let (status, label) = if cache == "connected" {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            cache: cache.to_string(),
        }),
    )
}
