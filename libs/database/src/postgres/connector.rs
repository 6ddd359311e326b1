use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::PostgresConfig;
use crate::common::{DatabaseError, RetryPolicy, retry_with_backoff};

/// Open a connection pool from `config`.
pub async fn connect(config: PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(config.into_connect_options()).await?;
    info!("Successfully connected to PostgreSQL database");
    Ok(db)
}

/// [`connect`] with exponential backoff, for startup while the database may
/// still be coming up.
pub async fn connect_with_retry(
    config: PostgresConfig,
    policy: RetryPolicy,
) -> Result<DatabaseConnection, DatabaseError> {
    retry_with_backoff(&policy, || connect(config.clone()))
        .await
        .map_err(|(e, attempts)| DatabaseError::ConnectionFailed {
            attempts,
            reason: e.to_string(),
        })
}

/// Apply all pending migrations of `M`.
///
/// ```ignore
/// run_migrations::<migration::Migrator>(&db, "catalog_api").await?;
/// ```
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> Result<(), DatabaseError> {
    info!("Running {} database migrations...", app_name);
    M::up(db, None)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
    info!("Migrations completed successfully for {}", app_name);
    Ok(())
}

/// Close the pool, logging instead of failing; used during shutdown.
pub async fn close(db: DatabaseConnection) {
    match db.close().await {
        Ok(()) => info!("PostgreSQL connection pool closed"),
        Err(e) => tracing::warn!("Error closing PostgreSQL pool: {}", e),
    }
}
