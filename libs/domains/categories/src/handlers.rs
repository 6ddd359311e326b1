use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AuditEvent, IdPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, InternalServerErrorResponse, NotFoundResponse,
        ValidationErrorResponse,
    },
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CategoryResult;
use crate::models::{Category, CategoryDeleted, CreateCategory, UpdateCategory};
use crate::repository::CategoryRepository;
use crate::service::CategoryService;

pub const TAG: &str = "category";

/// OpenAPI documentation for the category endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        get_category,
        get_category_by_slug,
        update_category,
        delete_category,
    ),
    components(
        schemas(Category, CreateCategory, UpdateCategory, CategoryDeleted),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            ValidationErrorResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Category hierarchy endpoints")
    )
)]
pub struct ApiDoc;

/// Category routes, unprefixed. The app nests them under `/api/category`.
pub fn router<R: CategoryRepository + 'static>(service: CategoryService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/slug/{slug}", get(get_category_by_slug))
        .route(
            "/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .with_state(shared_service)
}

/// List all categories
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All categories", body = Vec<Category>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
) -> CategoryResult<Json<Vec<Category>>> {
    let categories = service.list().await?;
    Ok(Json(categories))
}

/// Create a category
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, response = BadRequestResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CategoryResult<impl IntoResponse> {
    let category = service.create(input).await?;

    AuditEvent::success("category.create")
        .resource(format!("category:{}", category.id))
        .from_headers(&headers)
        .details(json!({
            "name": category.name,
            "slug": category.slug,
            "level": category.level,
            "parent_id": category.parent_id,
        }))
        .log();

    Ok((StatusCode::CREATED, Json(category)))
}

/// Get a category by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    IdPath(id): IdPath,
) -> CategoryResult<Json<Category>> {
    let category = service.get(id).await?;
    Ok(Json(category))
}

/// Get a category by slug
#[utoipa::path(
    get,
    path = "/slug/{slug}",
    tag = TAG,
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category_by_slug<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    Path(slug): Path<String>,
) -> CategoryResult<Json<Category>> {
    let category = service.get_by_slug(&slug).await?;
    Ok(Json(category))
}

/// Replace a category
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> CategoryResult<Json<Category>> {
    let category = service.update(id, input).await?;

    AuditEvent::success("category.update")
        .resource(format!("category:{}", id))
        .from_headers(&headers)
        .log();

    Ok(Json(category))
}

/// Delete a category without subcategories
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted", body = CategoryDeleted),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> CategoryResult<Json<CategoryDeleted>> {
    let deleted = service.delete(id).await?;

    AuditEvent::success("category.delete")
        .resource(format!("category:{}", id))
        .from_headers(&headers)
        .log();

    Ok(Json(deleted))
}
