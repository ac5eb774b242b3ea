//! Version store contract.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use modhub_core::result::AppResult;
use modhub_core::types::ResolvedFilter;
use modhub_entity::version::{NewVersion, Version, VersionDependency};

/// Shape of a list or count query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionQuery {
    /// Restrict to one mod.
    pub mod_id: Option<String>,
    /// Pagination, ordering and search. `None` lists every matching row,
    /// newest first.
    pub filter: Option<ResolvedFilter>,
    /// `false` selects approved rows, `true` the unapproved moderation
    /// queue. Denied rows never match either view.
    pub unapproved: bool,
}

impl VersionQuery {
    /// Query across all mods.
    pub fn all(filter: Option<ResolvedFilter>, unapproved: bool) -> Self {
        Self {
            mod_id: None,
            filter,
            unapproved,
        }
    }

    /// Query scoped to one mod.
    pub fn for_mod(
        mod_id: impl Into<String>,
        filter: Option<ResolvedFilter>,
        unapproved: bool,
    ) -> Self {
        Self {
            mod_id: Some(mod_id.into()),
            filter,
            unapproved,
        }
    }

    /// Whether a row is visible under this query's flag and parent.
    pub fn matches_visibility(&self, version: &Version) -> bool {
        version.approved == !self.unapproved
            && !version.denied
            && self.mod_id.as_deref().is_none_or(|m| m == version.mod_id)
    }
}

/// Durable storage for versions and their dependencies.
///
/// Implementations return `Conflict` from [`VersionStore::insert`] when the
/// `(mod_id, version)` pair already exists among non-denied versions.
#[async_trait]
pub trait VersionStore: Send + Sync + fmt::Debug + 'static {
    /// Find a version by id, regardless of moderation state.
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Version>>;

    /// Find every listed version. Missing ids are skipped.
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Version>>;

    /// Find a version of a mod by its version string.
    async fn find_by_name(&self, mod_id: &str, name: &str) -> AppResult<Option<Version>>;

    /// Find a version by id, only if it belongs to the given mod.
    async fn find_mod_version(&self, mod_id: &str, version_id: &str)
    -> AppResult<Option<Version>>;

    /// List versions matching the query.
    async fn list(&self, query: &VersionQuery) -> AppResult<Vec<Version>>;

    /// Count versions matching the query's parent, visibility and search.
    async fn count(&self, query: &VersionQuery) -> AppResult<i64>;

    /// Newest visible version per `(mod_id, stability)` for the given mods.
    async fn latest_per_stability(
        &self,
        mod_ids: &[String],
        unapproved: bool,
    ) -> AppResult<Vec<Version>>;

    /// Count non-denied versions of a mod carrying the given version string.
    async fn count_by_name(&self, mod_id: &str, name: &str) -> AppResult<i64>;

    /// Versions of a mod created strictly after `since`, oldest first.
    async fn created_since(&self, mod_id: &str, since: DateTime<Utc>) -> AppResult<Vec<Version>>;

    /// Persist a draft under the given id, with its dependencies.
    async fn insert(&self, id: &str, draft: &NewVersion) -> AppResult<Version>;

    /// Add one to the download counter. Returns `false` if the id is unknown.
    async fn increment_downloads(&self, id: &str) -> AppResult<bool>;

    /// Dependencies declared by a version.
    async fn dependencies(&self, version_id: &str) -> AppResult<Vec<VersionDependency>>;
}
