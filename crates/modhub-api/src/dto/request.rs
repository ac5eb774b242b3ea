//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use modhub_entity::version::{NewDependency, NewVersion, Stability};

/// Body of `POST /v1/mod/{mod_id}/versions`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateVersionRequest {
    /// Version string, unique within the mod.
    #[validate(length(min = 1, max = 255, message = "version must be 1-255 characters"))]
    pub version: String,
    /// Targeted game version.
    #[serde(default)]
    #[validate(length(max = 255))]
    pub game_version: String,
    /// Release notes.
    #[serde(default)]
    pub changelog: String,
    /// Stability classifier (`release`, `beta`, `alpha`).
    #[serde(default)]
    pub stability: Stability,
    /// Blob store key of the already uploaded archive.
    #[validate(length(min = 1, max = 255, message = "object_key must be 1-255 characters"))]
    pub object_key: String,
    /// Archive checksum.
    pub hash: Option<String>,
    /// Archive size in bytes.
    #[validate(range(min = 0))]
    pub size: Option<i64>,
    /// Free-form metadata.
    pub metadata: Option<serde_json::Value>,
    /// Declared dependencies.
    #[serde(default)]
    pub dependencies: Vec<NewDependency>,
}

impl CreateVersionRequest {
    /// Convert into a draft for the given mod.
    pub fn into_draft(self, mod_id: &str) -> NewVersion {
        NewVersion {
            mod_id: mod_id.to_string(),
            version: self.version,
            game_version: self.game_version,
            changelog: self.changelog,
            stability: self.stability,
            object_key: self.object_key,
            hash: self.hash,
            size: self.size,
            metadata: self.metadata,
            dependencies: self.dependencies,
        }
    }
}
