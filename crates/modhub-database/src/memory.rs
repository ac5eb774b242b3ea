//! In-memory version store using a Tokio mutex, for tests and local runs.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use modhub_core::error::AppError;
use modhub_core::result::AppResult;
use modhub_core::types::{SortDirection, VersionOrderField};
use modhub_entity::version::{NewVersion, Version, VersionDependency};

use crate::store::{VersionQuery, VersionStore};

#[derive(Debug, Default)]
struct InnerState {
    versions: Vec<Version>,
    dependencies: Vec<VersionDependency>,
}

/// Version store kept in process memory.
///
/// Enforces the same uniqueness rule as the Postgres partial index. Search
/// matches whole whitespace-separated tokens of the version string, every
/// term required.
#[derive(Debug, Clone, Default)]
pub struct MemoryVersionStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryVersionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed row, bypassing every check.
    pub async fn seed(&self, version: Version) {
        self.state.lock().await.versions.push(version);
    }

    /// Set the moderation flags of a version. Returns `false` if unknown.
    pub async fn moderate(&self, id: &str, approved: bool, denied: bool) -> bool {
        let mut state = self.state.lock().await;
        match state.versions.iter_mut().find(|v| v.id == id) {
            Some(version) => {
                version.approved = approved;
                version.denied = denied;
                version.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Current download counter of a version, read past any cache.
    pub async fn downloads(&self, id: &str) -> Option<i64> {
        let state = self.state.lock().await;
        state
            .versions
            .iter()
            .find(|v| v.id == id)
            .map(|v| v.downloads)
    }
}

fn matches_search(version: &Version, ts_query: &str) -> bool {
    ts_query.split(" & ").all(|term| {
        version
            .version
            .split_whitespace()
            .any(|token| token.eq_ignore_ascii_case(term))
    })
}

fn compare(a: &Version, b: &Version, field: VersionOrderField) -> Ordering {
    let primary = match field {
        VersionOrderField::CreatedAt => a.created_at.cmp(&b.created_at),
        VersionOrderField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        VersionOrderField::Downloads => a.downloads.cmp(&b.downloads),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

fn select(state: &InnerState, query: &VersionQuery) -> Vec<Version> {
    let ts_query = query.filter.as_ref().and_then(|f| f.ts_query());
    state
        .versions
        .iter()
        .filter(|v| query.matches_visibility(v))
        .filter(|v| ts_query.as_deref().is_none_or(|q| matches_search(v, q)))
        .cloned()
        .collect()
}

#[async_trait]
impl VersionStore for MemoryVersionStore {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Version>> {
        let state = self.state.lock().await;
        Ok(state.versions.iter().find(|v| v.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Version>> {
        let state = self.state.lock().await;
        Ok(state
            .versions
            .iter()
            .filter(|v| ids.contains(&v.id))
            .cloned()
            .collect())
    }

    async fn find_by_name(&self, mod_id: &str, name: &str) -> AppResult<Option<Version>> {
        let state = self.state.lock().await;
        Ok(state
            .versions
            .iter()
            .filter(|v| v.mod_id == mod_id && v.version == name)
            .min_by(|a, b| {
                a.denied
                    .cmp(&b.denied)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            })
            .cloned())
    }

    async fn find_mod_version(
        &self,
        mod_id: &str,
        version_id: &str,
    ) -> AppResult<Option<Version>> {
        let state = self.state.lock().await;
        Ok(state
            .versions
            .iter()
            .find(|v| v.mod_id == mod_id && v.id == version_id)
            .cloned())
    }

    async fn list(&self, query: &VersionQuery) -> AppResult<Vec<Version>> {
        let state = self.state.lock().await;
        let mut rows = select(&state, query);

        match &query.filter {
            Some(filter) => {
                rows.sort_by(|a, b| {
                    let ord = compare(a, b, filter.order_by);
                    match filter.order {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    }
                });
                Ok(rows
                    .into_iter()
                    .skip(filter.offset as usize)
                    .take(filter.limit as usize)
                    .collect())
            }
            None => {
                rows.sort_by(|a, b| compare(b, a, VersionOrderField::CreatedAt));
                Ok(rows)
            }
        }
    }

    async fn count(&self, query: &VersionQuery) -> AppResult<i64> {
        let state = self.state.lock().await;
        Ok(select(&state, query).len() as i64)
    }

    async fn latest_per_stability(
        &self,
        mod_ids: &[String],
        unapproved: bool,
    ) -> AppResult<Vec<Version>> {
        let state = self.state.lock().await;
        let mut latest: Vec<Version> = Vec::new();

        for version in state.versions.iter().filter(|v| {
            mod_ids.contains(&v.mod_id) && v.approved == !unapproved && !v.denied
        }) {
            match latest
                .iter_mut()
                .find(|l| l.mod_id == version.mod_id && l.stability == version.stability)
            {
                Some(current) if current.created_at < version.created_at => {
                    *current = version.clone();
                }
                Some(_) => {}
                None => latest.push(version.clone()),
            }
        }

        latest.sort_by(|a, b| {
            a.mod_id
                .cmp(&b.mod_id)
                .then_with(|| a.stability.cmp(&b.stability))
        });
        Ok(latest)
    }

    async fn count_by_name(&self, mod_id: &str, name: &str) -> AppResult<i64> {
        let state = self.state.lock().await;
        Ok(state
            .versions
            .iter()
            .filter(|v| v.mod_id == mod_id && v.version == name && !v.denied)
            .count() as i64)
    }

    async fn created_since(&self, mod_id: &str, since: DateTime<Utc>) -> AppResult<Vec<Version>> {
        let state = self.state.lock().await;
        let mut rows: Vec<Version> = state
            .versions
            .iter()
            .filter(|v| v.mod_id == mod_id && v.created_at > since)
            .cloned()
            .collect();
        rows.sort_by_key(|v| v.created_at);
        Ok(rows)
    }

    async fn insert(&self, id: &str, draft: &NewVersion) -> AppResult<Version> {
        let mut state = self.state.lock().await;

        if state
            .versions
            .iter()
            .any(|v| v.mod_id == draft.mod_id && v.version == draft.version && !v.denied)
        {
            return Err(AppError::conflict(format!(
                "Mod {} already has a version named '{}'",
                draft.mod_id, draft.version
            )));
        }
        for (i, dependency) in draft.dependencies.iter().enumerate() {
            if draft.dependencies[..i]
                .iter()
                .any(|d| d.mod_id == dependency.mod_id)
            {
                return Err(AppError::validation(format!(
                    "Dependency on mod {} is declared more than once",
                    dependency.mod_id
                )));
            }
        }

        let now = Utc::now();
        let version = Version {
            id: id.to_string(),
            mod_id: draft.mod_id.clone(),
            version: draft.version.clone(),
            game_version: draft.game_version.clone(),
            changelog: draft.changelog.clone(),
            downloads: 0,
            object_key: draft.object_key.clone(),
            stability: draft.stability,
            approved: false,
            denied: false,
            hash: draft.hash.clone(),
            size: draft.size,
            metadata: draft.metadata.clone(),
            created_at: now,
            updated_at: now,
        };

        state.versions.push(version.clone());
        state
            .dependencies
            .extend(draft.dependencies.iter().map(|d| VersionDependency {
                version_id: id.to_string(),
                mod_id: d.mod_id.clone(),
                condition: d.condition.clone(),
                optional: d.optional,
                created_at: now,
            }));

        Ok(version)
    }

    async fn increment_downloads(&self, id: &str) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.versions.iter_mut().find(|v| v.id == id) {
            Some(version) => {
                version.downloads += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn dependencies(&self, version_id: &str) -> AppResult<Vec<VersionDependency>> {
        let state = self.state.lock().await;
        let mut deps: Vec<VersionDependency> = state
            .dependencies
            .iter()
            .filter(|d| d.version_id == version_id)
            .cloned()
            .collect();
        deps.sort_by(|a, b| a.mod_id.cmp(&b.mod_id));
        Ok(deps)
    }
}
