//! Version dependency entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A requirement edge from a version to another mod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct VersionDependency {
    /// The version declaring the dependency.
    pub version_id: String,
    /// The required mod.
    pub mod_id: String,
    /// Version range the required mod must satisfy (e.g. `>=1.2.0`).
    pub condition: String,
    /// Whether the dependency may be absent.
    pub optional: bool,
    /// When the edge was recorded.
    pub created_at: DateTime<Utc>,
}

/// Dependency declared in a version draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDependency {
    /// The required mod.
    pub mod_id: String,
    /// Version range condition.
    pub condition: String,
    /// Whether the dependency may be absent.
    #[serde(default)]
    pub optional: bool,
}
