//! Maps catalog and infrastructure errors to HTTP responses.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use modhub_core::error::AppError;
use modhub_service::CatalogError;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error returned by handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A catalog operation failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The request body failed field validation.
    #[error("request validation failed")]
    InvalidBody(#[from] validator::ValidationErrors),
}

impl ApiError {
    /// A `404` for a resource that does not exist.
    pub fn not_found() -> Self {
        Self::Catalog(CatalogError::NotFound)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::Catalog(CatalogError::from(err))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Catalog(CatalogError::Encoding(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut retry_after = None;
        let mut details = None;

        let (status, error_code) = match &self {
            Self::Catalog(CatalogError::NotFound) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Catalog(CatalogError::DuplicateVersion { .. }) => {
                (StatusCode::CONFLICT, "DUPLICATE_VERSION")
            }
            Self::Catalog(CatalogError::RateLimitExceeded { retry_after: wait }) => {
                retry_after = Some(wait.as_secs().max(1));
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED")
            }
            Self::Catalog(CatalogError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            Self::InvalidBody(errors) => {
                details = serde_json::to_value(errors.field_errors()).ok();
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            Self::Catalog(CatalogError::Encoding(_) | CatalogError::Infrastructure(_)) => {
                tracing::error!(error = %self, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(seconds) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(seconds));
        }
        response
    }
}
