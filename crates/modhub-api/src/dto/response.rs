//! Response DTOs.

use serde::{Deserialize, Serialize};

use modhub_entity::version::Version;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Count response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Number of matching versions.
    pub count: i64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Limiter store status.
    pub cache: String,
}

/// Serialize versions, keeping only the projected fields when any are given.
pub fn project_versions(
    versions: &[Version],
    fields: &[String],
) -> Result<Vec<serde_json::Value>, serde_json::Error> {
    versions.iter().map(|v| v.project(fields)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use modhub_entity::version::Stability;

    #[test]
    fn test_projection_keeps_listed_fields_only() {
        let now = Utc::now();
        let version = Version {
            id: "a".into(),
            mod_id: "m".into(),
            version: "1.0.0".into(),
            game_version: String::new(),
            changelog: String::new(),
            downloads: 3,
            object_key: "m/1.0.0.zip".into(),
            stability: Stability::Beta,
            approved: true,
            denied: false,
            hash: None,
            size: None,
            metadata: None,
            created_at: now,
            updated_at: now,
        };

        let projected = project_versions(&[version], &["id".into(), "downloads".into()]).unwrap();
        assert_eq!(projected[0], serde_json::json!({ "id": "a", "downloads": 3 }));
    }
}
