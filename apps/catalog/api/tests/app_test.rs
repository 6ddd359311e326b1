//! Full-application tests: routing under the real prefixes, trailing
//! slashes, docs, CORS and the not-found fallback. Repositories are in-memory.

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, StatusCode, header};
use axum::response::Response;
use axum_helpers::{JwtAuth, JwtConfig, http::CorsConfig, with_normalized_paths};
use catalog_api::{api, build_app};
use core_config::app_info;
use domain_categories::{CategoryService, InMemoryCategoryRepository};
use domain_users::{InMemoryUserRepository, UserService};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let routes = api::routes(
        CategoryService::new(InMemoryCategoryRepository::new()),
        UserService::new(InMemoryUserRepository::new()),
        JwtAuth::new(&JwtConfig::new("app-test-secret")),
    );
    build_app(routes, &CorsConfig::default(), app_info!())
}

async fn send(request: Request<Body>) -> Response {
    with_normalized_paths(app()).oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_category_list_with_and_without_trailing_slash() {
    for uri in ["/api/category", "/api/category/"] {
        let response = send(get(uri)).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        assert_eq!(json_body(response).await, json!([]));
    }
}

#[tokio::test]
async fn test_users_mounted_at_users() {
    let response = send(get("/users/")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(get("/users/protected-user")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_category_detail() {
    let response = send(get("/api/category/12")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({"detail": "Category does not exist"}));
}

#[tokio::test]
async fn test_unknown_path_is_not_found_detail() {
    let response = send(get("/nothing/here")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({"detail": "Not Found"}));
}

#[tokio::test]
async fn test_health_reports_name_and_version() {
    let response = send(get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["name"], "catalog_api");
}

#[tokio::test]
async fn test_health_goes_through_shared_middleware() {
    let response = send(
        Request::builder()
            .uri("/health/")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        HeaderValue::from_static("http://localhost:5173")
    );
}

#[tokio::test]
async fn test_openapi_document_lists_both_resources() {
    let response = send(get("/api-docs/openapi.json")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let paths = body["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/category/{id}"));
    assert!(paths.contains_key("/users/token"));
}

#[tokio::test]
async fn test_cors_preflight_from_frontend_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/category/")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .unwrap();

    let response = send(request).await;
    let headers = response.headers();

    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        HeaderValue::from_static("http://localhost:5173")
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn test_create_then_login_through_full_app() {
    let app = with_normalized_paths(app());

    let create = Request::builder()
        .method(Method::POST)
        .uri("/users/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"username": "alice", "email": "alice@example.com", "password": "wonderland"})
                .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(create).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let login = Request::builder()
        .method(Method::POST)
        .uri("/users/token")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"username": "alice", "password": "wonderland"}).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(login).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let token = json_body(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let me = Request::builder()
        .uri("/users/protected-user")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(me).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["username"], "alice");
}
