//! Shared application state.

use database::postgres::DatabaseConnection;

/// Cloned into the readiness router and moved into the shutdown cleanup.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
}
