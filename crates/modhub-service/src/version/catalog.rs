//! Catalog query service: cached reads and throttled creation.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use modhub_cache::{QueryCache, keys};
use modhub_core::config::CatalogConfig;
use modhub_core::error::ErrorKind;
use modhub_core::types::{ResolvedFilter, VersionFilter, generate_id};
use modhub_database::{VersionQuery, VersionStore};
use modhub_entity::version::{NewVersion, Version, VersionDependency};

use crate::error::{CatalogError, CatalogResult};
use crate::version::throttle::CreationThrottle;

/// Reads go through the query cache; writes go to the store only.
#[derive(Debug, Clone)]
pub struct CatalogService {
    store: Arc<dyn VersionStore>,
    cache: Arc<QueryCache>,
    throttle: CreationThrottle,
}

impl CatalogService {
    /// Creates a new catalog service.
    pub fn new(
        store: Arc<dyn VersionStore>,
        cache: Arc<QueryCache>,
        config: &CatalogConfig,
    ) -> Self {
        let throttle = CreationThrottle::new(Arc::clone(&store), config);
        Self {
            store,
            cache,
            throttle,
        }
    }

    // ── Single versions ──────────────────────────────────────────────

    /// Get a version by id, regardless of moderation state.
    pub async fn get_version(&self, id: &str) -> CatalogResult<Option<Arc<Version>>> {
        let store = &self.store;
        Ok(self
            .cache
            .get_or_compute(keys::version(id), || async move {
                store.find_by_id(id).await.map(|v| v.map(Arc::new))
            })
            .await?)
    }

    /// Get a version scoped to its parent mod.
    pub async fn get_mod_version(
        &self,
        mod_id: &str,
        version_id: &str,
    ) -> CatalogResult<Option<Arc<Version>>> {
        let store = &self.store;
        Ok(self
            .cache
            .get_or_compute(keys::mod_version(mod_id, version_id), || async move {
                store
                    .find_mod_version(mod_id, version_id)
                    .await
                    .map(|v| v.map(Arc::new))
            })
            .await?)
    }

    /// Get a mod's version by its version string.
    pub async fn get_version_by_name(
        &self,
        mod_id: &str,
        name: &str,
    ) -> CatalogResult<Option<Arc<Version>>> {
        let store = &self.store;
        Ok(self
            .cache
            .get_or_compute(keys::version_by_name(mod_id, name), || async move {
                store
                    .find_by_name(mod_id, name)
                    .await
                    .map(|v| v.map(Arc::new))
            })
            .await?)
    }

    // ── Lists ────────────────────────────────────────────────────────

    /// Get several versions in request order.
    ///
    /// Repeated ids are collapsed. Returns `None` unless every id resolves.
    pub async fn list_versions_by_ids(
        &self,
        ids: &[String],
    ) -> CatalogResult<Option<Arc<Vec<Version>>>> {
        let mut seen = HashSet::new();
        let ids: Vec<String> = ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();

        if ids.is_empty() {
            return Ok(Some(Arc::new(Vec::new())));
        }

        let store = &self.store;
        let wanted = &ids;
        Ok(self
            .cache
            .get_or_compute(keys::versions_by_ids(&ids), || async move {
                let mut rows = store.find_by_ids(wanted).await?;
                if rows.len() != wanted.len() {
                    debug!(
                        requested = wanted.len(),
                        found = rows.len(),
                        "Not every requested version exists"
                    );
                    return Ok(None);
                }
                rows.sort_by_key(|v| wanted.iter().position(|id| *id == v.id));
                Ok::<_, modhub_core::error::AppError>(Some(Arc::new(rows)))
            })
            .await?)
    }

    /// Newest version of each stability class for one mod.
    pub async fn list_latest_versions(
        &self,
        mod_id: &str,
        include_unapproved: bool,
    ) -> CatalogResult<Arc<Vec<Version>>> {
        let store = &self.store;
        Ok(self
            .cache
            .get_or_compute(
                keys::mod_latest_versions(mod_id, include_unapproved),
                || async move {
                    store
                        .latest_per_stability(&[mod_id.to_string()], include_unapproved)
                        .await
                        .map(Arc::new)
                },
            )
            .await?)
    }

    /// Newest version of each stability class for several mods.
    ///
    /// The id set is sorted and de-duplicated first; the result does not
    /// depend on request order.
    pub async fn list_latest_versions_for_mods(
        &self,
        mod_ids: &[String],
        include_unapproved: bool,
    ) -> CatalogResult<Arc<Vec<Version>>> {
        let mut mod_ids = mod_ids.to_vec();
        mod_ids.sort();
        mod_ids.dedup();

        if mod_ids.is_empty() {
            return Ok(Arc::new(Vec::new()));
        }

        let store = &self.store;
        let mod_ids = &mod_ids;
        Ok(self
            .cache
            .get_or_compute(
                keys::mods_latest_versions(mod_ids, include_unapproved),
                || async move {
                    store
                        .latest_per_stability(mod_ids, include_unapproved)
                        .await
                        .map(Arc::new)
                },
            )
            .await?)
    }

    /// List versions across all mods. An absent filter lists everything,
    /// newest first.
    pub async fn list_versions(
        &self,
        filter: Option<&VersionFilter>,
        include_unapproved: bool,
    ) -> CatalogResult<Arc<Vec<Version>>> {
        let (resolved, hash) = prepare(filter)?;
        let query = VersionQuery::all(resolved, include_unapproved);
        self.list(keys::versions(hash.as_deref(), include_unapproved), query)
            .await
    }

    /// List one mod's versions.
    pub async fn list_mod_versions(
        &self,
        mod_id: &str,
        filter: Option<&VersionFilter>,
        include_unapproved: bool,
    ) -> CatalogResult<Arc<Vec<Version>>> {
        let (resolved, hash) = prepare(filter)?;
        let query = VersionQuery::for_mod(mod_id, resolved, include_unapproved);
        self.list(
            keys::mod_versions(mod_id, hash.as_deref(), include_unapproved),
            query,
        )
        .await
    }

    async fn list(&self, key: String, query: VersionQuery) -> CatalogResult<Arc<Vec<Version>>> {
        let store = &self.store;
        let query = &query;
        Ok(self
            .cache
            .get_or_compute(key, || async move { store.list(query).await.map(Arc::new) })
            .await?)
    }

    /// Count versions matching the filter's search. Pagination and
    /// projection do not affect the count.
    pub async fn count_versions(
        &self,
        filter: Option<&VersionFilter>,
        include_unapproved: bool,
    ) -> CatalogResult<i64> {
        // Only the search text shapes a count.
        let search_only = filter
            .map(|f| {
                f.validate()?;
                Ok::<_, CatalogError>(VersionFilter {
                    search: f.search.clone(),
                    ..VersionFilter::default()
                })
            })
            .transpose()?;
        let (resolved, hash) = prepare(search_only.as_ref())?;
        let query = VersionQuery::all(resolved, include_unapproved);
        let store = &self.store;
        let query = &query;
        Ok(self
            .cache
            .get_or_compute(
                keys::version_count(hash.as_deref(), include_unapproved),
                || async move { store.count(query).await },
            )
            .await?)
    }

    /// Dependencies declared by a version. Always read fresh.
    pub async fn list_dependencies(
        &self,
        version_id: &str,
    ) -> CatalogResult<Vec<VersionDependency>> {
        Ok(self.store.dependencies(version_id).await?)
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a version after the duplicate and quota checks pass.
    ///
    /// The new version starts unapproved and is not written to the cache.
    pub async fn create_version(&self, draft: NewVersion) -> CatalogResult<Version> {
        self.throttle.check_and_admit(&draft).await?;

        let id = generate_id();
        let version = self.store.insert(&id, &draft).await.map_err(|e| {
            if e.kind == ErrorKind::Conflict {
                CatalogError::DuplicateVersion {
                    mod_id: draft.mod_id.clone(),
                    version: draft.version.clone(),
                }
            } else {
                CatalogError::from(e)
            }
        })?;

        info!(
            version_id = %version.id,
            mod_id = %version.mod_id,
            version = %version.version,
            "Version created"
        );
        Ok(version)
    }
}

/// Validate and normalize a filter, returning it with its cache hash.
fn prepare(
    filter: Option<&VersionFilter>,
) -> CatalogResult<(Option<ResolvedFilter>, Option<String>)> {
    let Some(filter) = filter else {
        return Ok((None, None));
    };
    filter.validate()?;
    let resolved = filter.resolve();
    let hash = resolved.hash()?;
    Ok((Some(resolved), Some(hash)))
}
