//! Rolling-window creation quota.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use modhub_core::config::CatalogConfig;
use modhub_database::VersionStore;
use modhub_entity::version::NewVersion;

use crate::error::{CatalogError, CatalogResult};

/// Gatekeeper for version creation.
///
/// Both checks read the durable store. The unique index on
/// `(mod_id, version)` remains the final arbiter when two creations race.
#[derive(Debug, Clone)]
pub struct CreationThrottle {
    store: Arc<dyn VersionStore>,
    quota: u32,
    window: Duration,
}

impl CreationThrottle {
    /// Creates a throttle with the configured quota and window.
    pub fn new(store: Arc<dyn VersionStore>, config: &CatalogConfig) -> Self {
        Self {
            store,
            quota: config.creation_quota,
            window: config.creation_window(),
        }
    }

    /// Check a draft against the current time.
    pub async fn check_and_admit(&self, draft: &NewVersion) -> CatalogResult<()> {
        self.check_and_admit_at(draft, Utc::now()).await
    }

    /// Check a draft as of `now`.
    ///
    /// Rejects an invalid draft, then a duplicate version name, then a mod
    /// that already created `quota` versions after `now - window`.
    pub async fn check_and_admit_at(
        &self,
        draft: &NewVersion,
        now: DateTime<Utc>,
    ) -> CatalogResult<()> {
        draft.validate().map_err(CatalogError::Validation)?;

        if self
            .store
            .count_by_name(&draft.mod_id, &draft.version)
            .await?
            > 0
        {
            return Err(CatalogError::DuplicateVersion {
                mod_id: draft.mod_id.clone(),
                version: draft.version.clone(),
            });
        }

        let recent = self
            .store
            .created_since(&draft.mod_id, now - self.window)
            .await?;

        if recent.len() >= self.quota as usize {
            let retry_after = recent
                .first()
                .map(|oldest| oldest.created_at + self.window - now)
                .unwrap_or(self.window)
                .to_std()
                .unwrap_or_default();

            info!(
                mod_id = %draft.mod_id,
                recent = recent.len(),
                retry_after_secs = retry_after.as_secs(),
                "Version creation throttled"
            );
            return Err(CatalogError::RateLimitExceeded { retry_after });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modhub_database::MemoryVersionStore;
    use modhub_entity::version::{Stability, Version};

    fn row(id: &str, mod_id: &str, name: &str, created_at: DateTime<Utc>) -> Version {
        Version {
            id: id.into(),
            mod_id: mod_id.into(),
            version: name.into(),
            game_version: String::new(),
            changelog: String::new(),
            downloads: 0,
            object_key: format!("{mod_id}/{name}.zip"),
            stability: Stability::Release,
            approved: true,
            denied: false,
            hash: None,
            size: None,
            metadata: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn throttle(store: &MemoryVersionStore) -> CreationThrottle {
        CreationThrottle::new(Arc::new(store.clone()), &CatalogConfig::default())
    }

    async fn seed_recent(
        store: &MemoryVersionStore,
        mod_id: &str,
        count: usize,
        now: DateTime<Utc>,
    ) {
        for i in 0..count {
            let created = now - Duration::hours(10) + Duration::minutes(i as i64);
            store
                .seed(row(&format!("{mod_id}-{i}"), mod_id, &format!("0.{i}"), created))
                .await;
        }
    }

    #[tokio::test]
    async fn test_four_recent_versions_admit() {
        let store = MemoryVersionStore::new();
        let now = Utc::now();
        seed_recent(&store, "m", 4, now).await;

        let draft = NewVersion::new("m", "1.0.0", "m/1.0.0.zip");
        assert!(throttle(&store).check_and_admit_at(&draft, now).await.is_ok());
    }

    #[tokio::test]
    async fn test_five_recent_versions_reject_with_retry_after() {
        let store = MemoryVersionStore::new();
        let now = Utc::now();
        seed_recent(&store, "m", 5, now).await;

        let draft = NewVersion::new("m", "1.0.0", "m/1.0.0.zip");
        let err = throttle(&store)
            .check_and_admit_at(&draft, now)
            .await
            .unwrap_err();

        // Oldest was created 10h ago, so it leaves the window in 14h.
        assert!(matches!(
            err,
            CatalogError::RateLimitExceeded { retry_after }
                if retry_after == std::time::Duration::from_secs(14 * 3600)
        ));
        assert_eq!(err.retry_after_minutes(), Some(14 * 60));
    }

    #[tokio::test]
    async fn test_window_boundary_is_strict() {
        let store = MemoryVersionStore::new();
        let now = Utc::now();
        let draft = NewVersion::new("m", "2.0.0", "m/2.0.0.zip");

        // Four inside the window plus one exactly a second outside.
        seed_recent(&store, "m", 4, now).await;
        store
            .seed(row("edge", "m", "edge", now - Duration::hours(24) - Duration::seconds(1)))
            .await;
        assert!(throttle(&store).check_and_admit_at(&draft, now).await.is_ok());

        // One second inside the window counts.
        let store = MemoryVersionStore::new();
        seed_recent(&store, "m", 4, now).await;
        store
            .seed(row("edge", "m", "edge", now - Duration::hours(24) + Duration::seconds(1)))
            .await;
        let err = throttle(&store)
            .check_and_admit_at(&draft, now)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::RateLimitExceeded { retry_after }
                if retry_after == std::time::Duration::from_secs(1)
        ));
    }

    #[tokio::test]
    async fn test_denied_versions_count_toward_quota() {
        let store = MemoryVersionStore::new();
        let now = Utc::now();
        seed_recent(&store, "m", 5, now).await;
        assert!(store.moderate("m-0", false, true).await);

        let draft = NewVersion::new("m", "1.0.0", "m/1.0.0.zip");
        assert!(matches!(
            throttle(&store).check_and_admit_at(&draft, now).await,
            Err(CatalogError::RateLimitExceeded { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_is_scoped_to_mod() {
        let store = MemoryVersionStore::new();
        let now = Utc::now();
        store.seed(row("a", "m", "1.0.0", now)).await;

        let same_mod = NewVersion::new("m", "1.0.0", "m/1.0.0.zip");
        assert!(matches!(
            throttle(&store).check_and_admit_at(&same_mod, now).await,
            Err(CatalogError::DuplicateVersion { .. })
        ));

        let other_mod = NewVersion::new("n", "1.0.0", "n/1.0.0.zip");
        assert!(throttle(&store).check_and_admit_at(&other_mod, now).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_wins_over_quota() {
        let store = MemoryVersionStore::new();
        let now = Utc::now();
        seed_recent(&store, "m", 5, now).await;

        let draft = NewVersion::new("m", "0.0", "m/0.0.zip");
        assert!(matches!(
            throttle(&store).check_and_admit_at(&draft, now).await,
            Err(CatalogError::DuplicateVersion { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected_first() {
        let store = MemoryVersionStore::new();
        let draft = NewVersion::new("m", "", "m/x.zip");
        assert!(matches!(
            throttle(&store).check_and_admit(&draft).await,
            Err(CatalogError::Validation(_))
        ));
    }
}
