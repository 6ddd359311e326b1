use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

use crate::rules::{HAS_CHILDREN, NAME_LEVEL_TAKEN, PARENT_CYCLE, PARENT_NOT_FOUND, SLUG_TAKEN};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    /// Lookup by id or slug found nothing
    #[error("Category does not exist: {0}")]
    DoesNotExist(String),

    /// Update or delete target is missing
    #[error("Category not found: {0}")]
    NotFound(i32),

    #[error("Category name '{name}' already exists at level {level}")]
    NameLevelTaken { name: String, level: i32 },

    #[error("Category slug '{0}' already exists")]
    SlugTaken(String),

    #[error("Parent category does not exist")]
    ParentNotFound,

    #[error("Category {0} has subcategories")]
    HasChildren(i32),

    /// The requested parent is the category itself or one of its descendants
    #[error("Category {0} cannot be its own ancestor")]
    ParentCycle(i32),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CategoryResult<T> = Result<T, CategoryError>;

impl From<sea_orm::DbErr> for CategoryError {
    fn from(err: sea_orm::DbErr) -> Self {
        crate::rules::conflict_from_db(&err)
            .unwrap_or_else(|| CategoryError::Internal(format!("Database error: {}", err)))
    }
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::DoesNotExist(_) => {
                AppError::NotFound("Category does not exist".to_string())
            }
            CategoryError::NotFound(_) => AppError::NotFound("Category not found".to_string()),
            CategoryError::NameLevelTaken { .. } => AppError::Conflict(NAME_LEVEL_TAKEN.to_string()),
            CategoryError::SlugTaken(_) => AppError::Conflict(SLUG_TAKEN.to_string()),
            CategoryError::ParentNotFound => AppError::Conflict(PARENT_NOT_FOUND.to_string()),
            CategoryError::HasChildren(_) => AppError::Conflict(HAS_CHILDREN.to_string()),
            CategoryError::ParentCycle(_) => AppError::Conflict(PARENT_CYCLE.to_string()),
            CategoryError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
