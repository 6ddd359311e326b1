//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({ "detail": "Internal server error" })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unprocessable Entity - request shape is invalid",
    content_type = "application/json",
    example = json!({
        "detail": [{
            "loc": ["body", "name"],
            "msg": "length must be between 1 and 100",
            "type": "length"
        }]
    })
)]
pub struct ValidationErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({ "detail": "Category does not exist" })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unauthorized - missing, invalid or expired bearer token",
    content_type = "application/json",
    example = json!({ "detail": "Could not validate credentials" })
)]
pub struct UnauthorizedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - uniqueness or reference rule violated",
    content_type = "application/json",
    example = json!({ "detail": "Category slug already exists" })
)]
pub struct BadRequestResponse(pub ErrorResponse);
