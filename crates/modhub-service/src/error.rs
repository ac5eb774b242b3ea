//! Catalog business errors.

use std::time::Duration;

use thiserror::Error;

use modhub_core::error::{AppError, ErrorKind};

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors returned by catalog operations.
///
/// Everything except `Infrastructure` is a rejection the caller can act on.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The requested version does not exist.
    #[error("version not found")]
    NotFound,

    /// The mod already has a live version with this name.
    #[error("this mod already has a version with this name")]
    DuplicateVersion {
        /// Parent mod.
        mod_id: String,
        /// Rejected version string.
        version: String,
    },

    /// The mod used up its creation quota for the rolling window.
    #[error("please wait {} minutes to post another version", wait_minutes(.retry_after))]
    RateLimitExceeded {
        /// Time until the oldest counted version leaves the window.
        retry_after: Duration,
    },

    /// A filter could not be encoded for hashing.
    #[error("failed to encode query filter: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The request was malformed.
    #[error("{0}")]
    Validation(String),

    /// A store, cache or link provider failed.
    #[error(transparent)]
    Infrastructure(AppError),
}

impl CatalogError {
    /// Retry-after rounded to whole minutes, for rate-limit rejections.
    pub fn retry_after_minutes(&self) -> Option<u64> {
        match self {
            Self::RateLimitExceeded { retry_after } => Some(wait_minutes(retry_after)),
            _ => None,
        }
    }
}

/// Round a wait to the nearest whole minute.
fn wait_minutes(wait: &Duration) -> u64 {
    (wait.as_secs_f64() / 60.0).round() as u64
}

impl From<AppError> for CatalogError {
    fn from(err: AppError) -> Self {
        match err.kind {
            ErrorKind::NotFound => Self::NotFound,
            ErrorKind::Validation => Self::Validation(err.message),
            _ => Self::Infrastructure(err),
        }
    }
}
