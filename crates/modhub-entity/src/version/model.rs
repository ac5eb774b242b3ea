//! Version entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::dependency::NewDependency;
use super::stability::Stability;

/// Maximum length of the version string and the object key.
pub const MAX_VERSION_FIELD_LEN: usize = 255;

/// A published release of a mod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Version {
    /// Unique version identifier.
    pub id: String,
    /// The mod this version belongs to.
    pub mod_id: String,
    /// Version string, unique per mod among non-denied versions.
    pub version: String,
    /// Game version this release targets.
    pub game_version: String,
    /// Release notes.
    pub changelog: String,
    /// Counted downloads.
    pub downloads: i64,
    /// Blob store key of the uploaded archive.
    #[serde(skip_serializing, default)]
    pub object_key: String,
    /// Stability classifier.
    pub stability: Stability,
    /// Whether a moderator approved the version.
    pub approved: bool,
    /// Whether a moderator denied the version.
    pub denied: bool,
    /// Archive checksum.
    pub hash: Option<String>,
    /// Archive size in bytes.
    pub size: Option<i64>,
    /// Free-form metadata (JSON).
    pub metadata: Option<serde_json::Value>,
    /// When the version was created.
    pub created_at: DateTime<Utc>,
    /// When the version was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Version {
    /// Serialize the version keeping only the named fields.
    ///
    /// An empty projection keeps every field. Unknown names are ignored.
    pub fn project(&self, fields: &[String]) -> Result<serde_json::Value, serde_json::Error> {
        let value = serde_json::to_value(self)?;
        if fields.is_empty() {
            return Ok(value);
        }

        match value {
            serde_json::Value::Object(map) => Ok(serde_json::Value::Object(
                map.into_iter()
                    .filter(|(key, _)| fields.iter().any(|f| f == key))
                    .collect(),
            )),
            other => Ok(other),
        }
    }
}

/// Data required to create a new version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVersion {
    /// Parent mod.
    pub mod_id: String,
    /// Version string.
    pub version: String,
    /// Targeted game version.
    #[serde(default)]
    pub game_version: String,
    /// Release notes.
    #[serde(default)]
    pub changelog: String,
    /// Stability classifier.
    #[serde(default)]
    pub stability: Stability,
    /// Blob store key of the uploaded archive.
    pub object_key: String,
    /// Archive checksum.
    #[serde(default)]
    pub hash: Option<String>,
    /// Archive size in bytes.
    #[serde(default)]
    pub size: Option<i64>,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// Dependencies stored with the version.
    #[serde(default)]
    pub dependencies: Vec<NewDependency>,
}

impl NewVersion {
    /// Create a minimal draft.
    pub fn new(
        mod_id: impl Into<String>,
        version: impl Into<String>,
        object_key: impl Into<String>,
    ) -> Self {
        Self {
            mod_id: mod_id.into(),
            version: version.into(),
            game_version: String::new(),
            changelog: String::new(),
            stability: Stability::default(),
            object_key: object_key.into(),
            hash: None,
            size: None,
            metadata: None,
            dependencies: Vec::new(),
        }
    }

    /// Set the stability classifier.
    pub fn with_stability(mut self, stability: Stability) -> Self {
        self.stability = stability;
        self
    }

    /// Add a dependency.
    pub fn with_dependency(mut self, dependency: NewDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Check the draft's field constraints.
    pub fn validate(&self) -> Result<(), String> {
        if self.version.trim().is_empty() {
            return Err("version must not be empty".to_string());
        }
        if self.version.len() > MAX_VERSION_FIELD_LEN {
            return Err(format!(
                "version must be at most {MAX_VERSION_FIELD_LEN} characters"
            ));
        }
        if self.object_key.trim().is_empty() {
            return Err("object_key must not be empty".to_string());
        }
        if self.object_key.len() > MAX_VERSION_FIELD_LEN {
            return Err(format!(
                "object_key must be at most {MAX_VERSION_FIELD_LEN} characters"
            ));
        }
        if let Some(size) = self.size {
            if size < 0 {
                return Err("size must not be negative".to_string());
            }
        }
        if self.dependencies.iter().any(|d| d.mod_id == self.mod_id) {
            return Err("a version cannot depend on its own mod".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Version {
        let now = Utc::now();
        Version {
            id: "v1".into(),
            mod_id: "m1".into(),
            version: "1.0.0".into(),
            game_version: "0.3".into(),
            changelog: "first".into(),
            downloads: 3,
            object_key: "mods/m1/1.0.0.zip".into(),
            stability: Stability::Release,
            approved: true,
            denied: false,
            hash: None,
            size: Some(42),
            metadata: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_object_key_is_not_serialized() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("object_key").is_none());
        assert_eq!(value["version"], "1.0.0");
    }

    #[test]
    fn test_project_keeps_listed_fields() {
        let fields = vec!["id".to_string(), "downloads".to_string()];
        let value = sample().project(&fields).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["downloads"], 3);
    }

    #[test]
    fn test_empty_projection_keeps_everything() {
        let value = sample().project(&[]).unwrap();
        assert!(value.get("changelog").is_some());
        assert!(value.get("created_at").is_some());
    }

    #[test]
    fn test_validate_draft() {
        assert!(NewVersion::new("m1", "1.0.0", "key").validate().is_ok());
        assert!(NewVersion::new("m1", "  ", "key").validate().is_err());
        assert!(NewVersion::new("m1", "1.0.0", "").validate().is_err());
        assert!(
            NewVersion::new("m1", "x".repeat(256), "key")
                .validate()
                .is_err()
        );

        let self_dep = NewVersion::new("m1", "1.0.0", "key").with_dependency(NewDependency {
            mod_id: "m1".into(),
            condition: "*".into(),
            optional: false,
        });
        assert!(self_dep.validate().is_err());
    }
}
