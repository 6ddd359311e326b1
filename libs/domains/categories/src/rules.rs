//! Hierarchy and uniqueness rules for categories.
//!
//! The in-process check gives a clean message before touching the database.
//! The unique indexes and the parent foreign key enforce the same rules under
//! concurrency; [`conflict_from_db`] maps their violations back to these messages.

use sea_orm::{DbErr, SqlErr};
use std::collections::HashSet;

use crate::error::{CategoryError, CategoryResult};
use crate::models::CreateCategory;
use crate::repository::CategoryRepository;

pub const NAME_LEVEL_TAKEN: &str = "Category name and level already exists";
pub const SLUG_TAKEN: &str = "Category slug already exists";
pub const PARENT_NOT_FOUND: &str = "Parent category does not exist";
pub const HAS_CHILDREN: &str = "Category has subcategories";
pub const PARENT_CYCLE: &str = "Category cannot be its own ancestor";

/// Constraint names created by the category migration
pub const NAME_LEVEL_CONSTRAINT: &str = "uq_category_name_level";
pub const SLUG_CONSTRAINT: &str = "uq_category_slug";
pub const PARENT_CONSTRAINT: &str = "fk_category_parent_id";

/// Reject a candidate that would duplicate an existing (name, level) or slug.
///
/// The name+level rule is checked first and is the one reported when both fail.
pub async fn check_existing<R>(repository: &R, candidate: &CreateCategory) -> CategoryResult<()>
where
    R: CategoryRepository + ?Sized,
{
    if repository
        .exists_by_name_and_level(&candidate.name, candidate.level)
        .await?
    {
        return Err(CategoryError::NameLevelTaken {
            name: candidate.name.clone(),
            level: candidate.level,
        });
    }

    if repository.exists_by_slug(&candidate.slug).await? {
        return Err(CategoryError::SlugTaken(candidate.slug.clone()));
    }

    Ok(())
}

/// Reject a parent for `id` that is `id` itself or one of its descendants.
///
/// Walks up from `parent_id` until it reaches a root or a missing row. An
/// unknown parent is left for the foreign key to report.
pub async fn check_ancestry<R>(repository: &R, id: i32, parent_id: Option<i32>) -> CategoryResult<()>
where
    R: CategoryRepository + ?Sized,
{
    let mut seen = HashSet::new();
    let mut current = parent_id;

    while let Some(ancestor) = current {
        if ancestor == id {
            return Err(CategoryError::ParentCycle(id));
        }
        // A loop that does not pass through `id` was there before this update
        if !seen.insert(ancestor) {
            break;
        }
        current = match repository.get_by_id(ancestor).await? {
            Some(category) => category.parent_id,
            None => break,
        };
    }

    Ok(())
}

/// Translate a constraint violation into the matching domain error.
///
/// Returns `None` for anything that is not one of the category constraints.
pub fn conflict_from_db(err: &DbErr) -> Option<CategoryError> {
    match err.sql_err()? {
        SqlErr::UniqueConstraintViolation(message) => unique_violation(&message),
        SqlErr::ForeignKeyConstraintViolation(message) => foreign_key_violation(&message),
        _ => None,
    }
}

fn unique_violation(message: &str) -> Option<CategoryError> {
    if message.contains(NAME_LEVEL_CONSTRAINT) {
        Some(CategoryError::NameLevelTaken {
            name: String::new(),
            level: 0,
        })
    } else if message.contains(SLUG_CONSTRAINT) {
        Some(CategoryError::SlugTaken(String::new()))
    } else {
        None
    }
}

fn foreign_key_violation(message: &str) -> Option<CategoryError> {
    if !message.contains(PARENT_CONSTRAINT) {
        return None;
    }
    // Postgres words the two directions differently:
    // insert/update on the child vs. update/delete on the referenced row.
    if message.contains("insert or update on table") {
        Some(CategoryError::ParentNotFound)
    } else {
        Some(CategoryError::HasChildren(0))
    }
}
