//! Database migration runner.

use sqlx::PgPool;
use tracing::info;

use modhub_core::error::{AppError, ErrorKind};
use modhub_core::result::AppResult;

/// Apply all pending migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    info!("Running database migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations completed");
    Ok(())
}
