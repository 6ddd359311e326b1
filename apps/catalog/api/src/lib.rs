//! Catalog API: categories and users over HTTP.
//!
//! The binary in `main.rs` wires configuration, the database and shutdown;
//! everything here is also used by the integration tests and the seed binary.

pub mod api;
pub mod config;
pub mod openapi;
pub mod seed;
pub mod state;

use axum::Router;
use axum_helpers::{create_router, health_router, http::CorsConfig};
use core_config::AppInfo;

/// Full application router: docs, API routes, `/health` and the shared middleware.
///
/// `/health` sits inside the middleware stack with the API routes. `/ready`
/// needs the database, so the caller merges it into `api_routes`.
pub fn build_app(api_routes: Router, cors: &CorsConfig, app_info: AppInfo) -> Router {
    create_router::<openapi::ApiDoc>(api_routes.merge(health_router(app_info)), cors)
}
