//! Embedded migration runner.

use std::time::{Duration, Instant};

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::{MIGRATIONS, PgClient, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Outcome of a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Versions applied by this run, oldest first.
    pub applied_versions: Vec<String>,
    /// Wall-clock time spent applying them.
    pub duration: Duration,
}

/// Runs all pending migrations on the database.
///
/// Diesel's migration harness is synchronous, so the pooled connection is
/// wrapped and driven on a blocking thread.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    tracing::info!(target: TRACING_TARGET_MIGRATION, "starting database migrations");

    let start_time = Instant::now();
    let conn = pg.get_pooled_connection().await?;
    let mut conn: AsyncConnectionWrapper<_> = conn.into();

    let (versions, conn) = spawn_blocking(move || {
        let versions = conn.run_pending_migrations(MIGRATIONS).map(|versions| {
            versions
                .into_iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
        });
        (versions, conn)
    })
    .await
    .map_err(|err| {
        tracing::error!(target: TRACING_TARGET_MIGRATION, error = %err, "migration task panicked");
        PgError::Migration(err.into())
    })?;

    drop(conn);

    let duration = start_time.elapsed();
    let applied_versions = versions.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            duration = ?duration,
            error = %err,
            "database migrations failed"
        );
        PgError::Migration(err)
    })?;

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        duration = ?duration,
        migrations_count = applied_versions.len(),
        "database migrations completed"
    );

    Ok(MigrationResult {
        applied_versions,
        duration,
    })
}
