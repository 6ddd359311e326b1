//! Seed the starter category tree. Safe to run repeatedly.

use catalog_api::{config::Config, seed::seed_categories};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryPolicy;
use domain_categories::{CategoryService, PgCategoryRepository};
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = database::postgres::connect_with_retry(config.database.clone(), RetryPolicy::new(3))
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    database::postgres::run_migrations::<migration::Migrator>(&db, "seed_categories")
        .await
        .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

    let service = CategoryService::new(PgCategoryRepository::new(db.clone()));
    let report = seed_categories(&service)
        .await
        .map_err(|e| eyre::eyre!("Seeding failed: {}", e))?;

    info!(created = report.created, skipped = report.skipped, "Seeding finished");

    database::postgres::close(db).await;
    Ok(())
}
