use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, AuthError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::password::PasswordError;

pub const USER_NOT_FOUND: &str = "User not found";
pub const USERNAME_TAKEN: &str = "Username already registered";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const COULD_NOT_VALIDATE: &str = "Could not validate credentials";

/// Unique index on `users.username`
pub const USERNAME_CONSTRAINT: &str = "uq_users_username";

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(i32),

    #[error("Username '{0}' already registered")]
    UsernameTaken(String),

    /// Login failed; which part was wrong is not disclosed
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Bearer identity could not be resolved
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    PasswordHash(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] AuthError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<DbErr> for UserError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) if msg.contains(USERNAME_CONSTRAINT) => {
                UserError::UsernameTaken(String::new())
            }
            _ => UserError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AppError::NotFound(USER_NOT_FOUND.to_string()),
            UserError::UsernameTaken(_) => AppError::Conflict(USERNAME_TAKEN.to_string()),
            UserError::InvalidCredentials => AppError::BadRequest(INVALID_CREDENTIALS.to_string()),
            UserError::Unauthorized(reason) => {
                tracing::debug!(reason = %reason, "Rejected bearer credentials");
                AppError::Unauthorized(COULD_NOT_VALIDATE.to_string())
            }
            UserError::PasswordHash(e) => AppError::Internal(e.to_string()),
            UserError::Token(e) => AppError::Internal(format!("Token error: {}", e)),
            UserError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
