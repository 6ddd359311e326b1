//! Integer id path parameter extractor.

use crate::errors::{AppError, ValidationIssue};
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Extractor for the `{id}` path segment of item routes.
///
/// A segment that is not an integer is rejected with 422 before the handler
/// runs, so handlers never see a half-parsed id.
///
/// # Example
/// ```ignore
/// use axum::{Router, routing::get};
/// use axum_helpers::extractors::IdPath;
///
/// async fn get_category(IdPath(id): IdPath) -> String {
///     format!("Category {}", id)
/// }
///
/// let app: Router = Router::new().route("/{id}", get(get_category));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i32);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::Internal(format!("path extraction failed: {}", e.body_text())))?;

        raw.parse::<i32>().map(IdPath).map_err(|_| {
            AppError::Validation(vec![ValidationIssue::path(
                "id",
                "Input should be a valid integer",
                "int_parsing",
            )])
        })
    }
}
