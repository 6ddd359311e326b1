//! JSON extractor with automatic validation using the validator crate.

use crate::errors::{AppError, ValidationIssue};
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON extractor with automatic validation.
///
/// Deserialization failures and `Validate` failures both reject with 422.
/// Each failing rule becomes one issue located at `["body", <field>]`.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::post;
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct CreateCategory {
///     #[validate(length(min = 1, max = 100))]
///     name: String,
/// }
///
/// async fn create(ValidatedJson(payload): ValidatedJson<CreateCategory>) -> String {
///     payload.name
/// }
///
/// let app: Router = Router::new().route("/", post(create));
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;

        data.validate()
            .map_err(|e| AppError::Validation(validation_issues(&e)))?;

        Ok(ValidatedJson(data))
    }
}

/// Flatten validator output into body-located issues, ordered by field name.
pub fn validation_issues(errors: &ValidationErrors) -> Vec<ValidationIssue> {
    let mut issues: Vec<ValidationIssue> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let msg = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid {}", field));
                ValidationIssue::body(field.to_string(), msg, err.code.to_string())
            })
        })
        .collect();

    issues.sort_by(|a, b| a.loc.cmp(&b.loc));
    issues
}
