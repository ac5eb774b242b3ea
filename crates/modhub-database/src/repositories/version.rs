//! Version repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use modhub_core::error::{AppError, ErrorKind};
use modhub_core::result::AppResult;
use modhub_entity::version::{NewVersion, Version, VersionDependency};

use crate::store::{VersionQuery, VersionStore};

/// Partial unique index over `(mod_id, version)` for non-denied rows.
const UNIQUE_VERSION_CONSTRAINT: &str = "versions_mod_id_version_key";
/// Primary key of `version_dependencies`.
const DEPENDENCY_PKEY_CONSTRAINT: &str = "version_dependencies_pkey";

/// Repository for version queries and mutations.
#[derive(Debug, Clone)]
pub struct VersionRepository {
    pool: PgPool,
}

impl VersionRepository {
    /// Create a new version repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append the visibility, parent and search predicates.
    fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, query: &VersionQuery) {
        builder
            .push(" WHERE approved = ")
            .push_bind(!query.unapproved)
            .push(" AND denied = FALSE");

        if let Some(mod_id) = &query.mod_id {
            builder.push(" AND mod_id = ").push_bind(mod_id.clone());
        }

        if let Some(ts_query) = query.filter.as_ref().and_then(|f| f.ts_query()) {
            builder
                .push(" AND to_tsvector('simple', version) @@ to_tsquery('simple', ")
                .push_bind(ts_query)
                .push(")");
        }
    }
}

#[async_trait]
impl VersionStore for VersionRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Version>> {
        sqlx::query_as::<_, Version>("SELECT * FROM versions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find version", e))
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Version>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Version>("SELECT * FROM versions WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find versions by id", e)
            })
    }

    async fn find_by_name(&self, mod_id: &str, name: &str) -> AppResult<Option<Version>> {
        // Denied rows may share a name with a live one; prefer the live row.
        sqlx::query_as::<_, Version>(
            "SELECT * FROM versions WHERE mod_id = $1 AND version = $2 \
             ORDER BY denied ASC, created_at DESC LIMIT 1",
        )
        .bind(mod_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find version by name", e)
        })
    }

    async fn find_mod_version(
        &self,
        mod_id: &str,
        version_id: &str,
    ) -> AppResult<Option<Version>> {
        sqlx::query_as::<_, Version>("SELECT * FROM versions WHERE mod_id = $1 AND id = $2")
            .bind(mod_id)
            .bind(version_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find mod version", e)
            })
    }

    async fn list(&self, query: &VersionQuery) -> AppResult<Vec<Version>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM versions");
        Self::push_conditions(&mut builder, query);

        match &query.filter {
            Some(filter) => {
                let direction = filter.order.as_sql();
                builder
                    .push(format!(
                        " ORDER BY {} {direction}, id {direction}",
                        filter.order_by.as_column()
                    ))
                    .push(" LIMIT ")
                    .push_bind(i64::from(filter.limit))
                    .push(" OFFSET ")
                    .push_bind(i64::from(filter.offset));
            }
            None => {
                builder.push(" ORDER BY created_at DESC, id DESC");
            }
        }

        builder
            .build_query_as::<Version>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list versions", e))
    }

    async fn count(&self, query: &VersionQuery) -> AppResult<i64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM versions");
        Self::push_conditions(&mut builder, query);

        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count versions", e))
    }

    async fn latest_per_stability(
        &self,
        mod_ids: &[String],
        unapproved: bool,
    ) -> AppResult<Vec<Version>> {
        if mod_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Version>(
            "SELECT DISTINCT ON (mod_id, stability) * FROM versions \
             WHERE mod_id = ANY($1) AND approved = $2 AND denied = FALSE \
             ORDER BY mod_id, stability, created_at DESC",
        )
        .bind(mod_ids)
        .bind(!unapproved)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list latest versions", e)
        })
    }

    async fn count_by_name(&self, mod_id: &str, name: &str) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM versions WHERE mod_id = $1 AND version = $2 AND denied = FALSE",
        )
        .bind(mod_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count versions by name", e)
        })
    }

    async fn created_since(&self, mod_id: &str, since: DateTime<Utc>) -> AppResult<Vec<Version>> {
        sqlx::query_as::<_, Version>(
            "SELECT * FROM versions WHERE mod_id = $1 AND created_at > $2 ORDER BY created_at ASC",
        )
        .bind(mod_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list recent versions", e)
        })
    }

    async fn insert(&self, id: &str, draft: &NewVersion) -> AppResult<Version> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let version = sqlx::query_as::<_, Version>(
            "INSERT INTO versions (id, mod_id, version, game_version, changelog, object_key, \
             stability, hash, size, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(id)
        .bind(&draft.mod_id)
        .bind(&draft.version)
        .bind(&draft.game_version)
        .bind(&draft.changelog)
        .bind(&draft.object_key)
        .bind(draft.stability)
        .bind(&draft.hash)
        .bind(draft.size)
        .bind(&draft.metadata)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some(UNIQUE_VERSION_CONSTRAINT) =>
            {
                AppError::conflict(format!(
                    "Mod {} already has a version named '{}'",
                    draft.mod_id, draft.version
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create version", e),
        })?;

        for dependency in &draft.dependencies {
            sqlx::query(
                "INSERT INTO version_dependencies (version_id, mod_id, condition, optional) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(id)
            .bind(&dependency.mod_id)
            .bind(&dependency.condition)
            .bind(dependency.optional)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err)
                    if db_err.constraint() == Some(DEPENDENCY_PKEY_CONSTRAINT) =>
                {
                    AppError::validation(format!(
                        "Dependency on mod {} is declared more than once",
                        dependency.mod_id
                    ))
                }
                _ => AppError::with_source(
                    ErrorKind::Database,
                    "Failed to create version dependency",
                    e,
                ),
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit version", e)
        })?;

        Ok(version)
    }

    async fn increment_downloads(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("UPDATE versions SET downloads = downloads + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to increment downloads", e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn dependencies(&self, version_id: &str) -> AppResult<Vec<VersionDependency>> {
        sqlx::query_as::<_, VersionDependency>(
            "SELECT * FROM version_dependencies WHERE version_id = $1 ORDER BY mod_id ASC",
        )
        .bind(version_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list version dependencies", e)
        })
    }
}
