use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse, axum_helpers::ValidationIssue)
    ),
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Category hierarchy and user accounts with token login"
    ),
    nest(
        (path = "/api/category", api = domain_categories::handlers::ApiDoc),
        (path = "/users", api = domain_users::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
