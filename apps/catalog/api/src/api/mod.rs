use axum::Router;
use axum_helpers::JwtAuth;
use domain_categories::{CategoryRepository, CategoryService};
use domain_users::{UserRepository, UserService};

pub mod health;

/// Mount point of the category routes
pub const CATEGORY_PATH: &str = "/api/category";
/// Mount point of the user routes
pub const USERS_PATH: &str = "/users";

/// API routes over any repositories.
///
/// `main` passes the Postgres repositories; tests pass in-memory ones.
pub fn routes<C, U>(categories: CategoryService<C>, users: UserService<U>, tokens: JwtAuth) -> Router
where
    C: CategoryRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .nest(CATEGORY_PATH, domain_categories::handlers::router(categories))
        .nest(USERS_PATH, domain_users::handlers::router(users, tokens))
}

/// Postgres-backed routes for the running service.
pub fn postgres_routes(state: &crate::state::AppState) -> Router {
    use domain_categories::PgCategoryRepository;
    use domain_users::PgUserRepository;

    routes(
        CategoryService::new(PgCategoryRepository::new(state.db.clone())),
        UserService::new(PgUserRepository::new(state.db.clone())),
        JwtAuth::new(&state.config.jwt),
    )
}

/// `/ready`, backed by a database round trip.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
