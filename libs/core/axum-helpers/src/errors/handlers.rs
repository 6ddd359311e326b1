use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::ErrorResponse;

/// Fallback for unmatched routes: `404 {"detail": "Not Found"}`.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::message("Not Found"))).into_response()
}
