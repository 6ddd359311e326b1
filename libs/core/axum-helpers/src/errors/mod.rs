pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// The only message a client sees for a failure it did not cause.
pub const INTERNAL_ERROR_DETAIL: &str = "Internal server error";

/// Body of every error response.
///
/// `detail` is a string for domain errors and a list of [`ValidationIssue`]
/// for request-shape errors:
///
/// ```json
/// { "detail": "Category does not exist" }
/// { "detail": [{ "loc": ["body", "email"], "msg": "invalid email", "type": "email" }] }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(value_type = Object)]
    pub detail: serde_json::Value,
}

impl ErrorResponse {
    pub fn message(detail: impl Into<String>) -> Self {
        Self {
            detail: serde_json::Value::String(detail.into()),
        }
    }
}

/// One field-level problem in a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationIssue {
    /// Where the problem is, e.g. `["body", "slug"]` or `["path", "id"]`
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ValidationIssue {
    pub fn body(field: impl Into<String>, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".to_string(), field.into()],
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    pub fn path(param: impl Into<String>, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: vec!["path".to_string(), param.into()],
            msg: msg.into(),
            kind: kind.into(),
        }
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Domain crates convert their own error enums into this one; it is the single
/// place where error kinds become status codes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Request validation failed: {0:?}")]
    Validation(Vec<ValidationIssue>),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    /// Uniqueness or reference violation. Reported to clients as 400.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// The wrapped text is logged, never returned.
    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::JsonExtractorRejection(JsonRejection::BytesRejection(rejection)) => {
                rejection.status()
            }
            AppError::JsonExtractorRejection(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let detail = match self {
            AppError::Validation(issues) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    issues
                );
                serde_json::to_value(issues).unwrap_or(serde_json::Value::Null)
            }
            AppError::JsonExtractorRejection(rejection) => {
                tracing::info!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    rejection
                );
                let issue = ValidationIssue {
                    loc: vec!["body".to_string()],
                    msg: rejection.body_text(),
                    kind: "json_invalid".to_string(),
                };
                serde_json::to_value(vec![issue]).unwrap_or(serde_json::Value::Null)
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::BadRequest.code(), "Bad request: {}", msg);
                msg.into()
            }
            AppError::Conflict(msg) => {
                tracing::info!(error_code = ErrorCode::Conflict.code(), "Conflict: {}", msg);
                msg.into()
            }
            AppError::Unauthorized(msg) => {
                tracing::info!(error_code = ErrorCode::Unauthorized.code(), "Unauthorized: {}", msg);
                let body = Json(ErrorResponse::message(msg));
                return (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                msg.into()
            }
            AppError::Database(e) => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseError.code(),
                    "Database error: {:?}",
                    e
                );
                INTERNAL_ERROR_DETAIL.into()
            }
            AppError::Internal(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                INTERNAL_ERROR_DETAIL.into()
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_renders_detail_string() {
        let response = AppError::NotFound("Category does not exist".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"detail": "Category does not exist"}));
    }

    #[tokio::test]
    async fn test_conflict_is_reported_as_bad_request() {
        let response = AppError::Conflict("Category slug already exists".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unauthorized_carries_bearer_challenge() {
        let response =
            AppError::Unauthorized("Could not validate credentials".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
        assert_eq!(
            body_json(response).await,
            json!({"detail": "Could not validate credentials"})
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_cause() {
        let response =
            AppError::Internal("connection refused at 10.0.0.3:5432".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({"detail": "Internal server error"}));
    }

    #[tokio::test]
    async fn test_database_error_hides_cause() {
        let response = AppError::from(DbErr::Custom("relation missing".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({"detail": "Internal server error"}));
    }

    #[tokio::test]
    async fn test_validation_renders_issue_list() {
        let response = AppError::Validation(vec![ValidationIssue::body(
            "email",
            "invalid email",
            "email",
        )])
        .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            json!({"detail": [{"loc": ["body", "email"], "msg": "invalid email", "type": "email"}]})
        );
    }
}
