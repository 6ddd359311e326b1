use axum_helpers::server::create_production_app;
use catalog_api::{api, build_app, config::Config, config::SHUTDOWN_TIMEOUT, state::AppState};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryPolicy;
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = database::postgres::connect_with_retry(config.database.clone(), RetryPolicy::default())
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

    let state = AppState { config, db };

    let api_routes = api::postgres_routes(&state).merge(api::ready_router(state.clone()));
    let app = build_app(api_routes, &state.config.cors, state.config.app.clone());

    info!(
        "Starting catalog API with graceful shutdown ({}s timeout)",
        SHUTDOWN_TIMEOUT.as_secs()
    );

    // State moves here for cleanup
    let AppState { config, db } = state;
    create_production_app(app, &config.server, SHUTDOWN_TIMEOUT, async move {
        info!("Shutting down: closing database connections");
        database::postgres::close(db).await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
