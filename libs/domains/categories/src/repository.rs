use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, CreateCategory, UpdateCategory};

/// Repository trait for Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by id
    async fn list(&self) -> CategoryResult<Vec<Category>>;

    async fn get_by_id(&self, id: i32) -> CategoryResult<Option<Category>>;

    async fn get_by_slug(&self, slug: &str) -> CategoryResult<Option<Category>>;

    async fn exists_by_name_and_level(&self, name: &str, level: i32) -> CategoryResult<bool>;

    async fn exists_by_slug(&self, slug: &str) -> CategoryResult<bool>;

    /// Whether any other category names `id` as its parent
    async fn has_children(&self, id: i32) -> CategoryResult<bool>;

    async fn create(&self, input: CreateCategory) -> CategoryResult<Category>;

    /// Replace every field of `id`; `None` when the row is gone
    async fn update(&self, id: i32, input: UpdateCategory) -> CategoryResult<Option<Category>>;

    /// Returns true when a row was removed
    async fn delete(&self, id: i32) -> CategoryResult<bool>;
}

/// In-memory implementation for tests and local runs.
///
/// Enforces the same constraints the database does, so handler tests see the
/// same conflicts production would.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCategoryRepository {
    state: Arc<RwLock<Store>>,
}

#[derive(Debug, Default)]
struct Store {
    rows: BTreeMap<i32, Category>,
    next_id: i32,
}

impl Store {
    fn check_constraints(&self, id: Option<i32>, input: &UpdateCategory) -> CategoryResult<()> {
        let others = || self.rows.values().filter(move |c| Some(c.id) != id);

        if others().any(|c| c.name == input.name && c.level == input.level) {
            return Err(CategoryError::NameLevelTaken {
                name: input.name.clone(),
                level: input.level,
            });
        }
        if others().any(|c| c.slug == input.slug) {
            return Err(CategoryError::SlugTaken(input.slug.clone()));
        }
        if let Some(parent_id) = input.parent_id {
            if !self.rows.contains_key(&parent_id) {
                return Err(CategoryError::ParentNotFound);
            }
        }
        Ok(())
    }

    fn has_children(&self, id: i32) -> bool {
        self.rows
            .values()
            .any(|c| c.parent_id == Some(id) && c.id != id)
    }
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list(&self) -> CategoryResult<Vec<Category>> {
        let store = self.state.read().await;
        Ok(store.rows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i32) -> CategoryResult<Option<Category>> {
        let store = self.state.read().await;
        Ok(store.rows.get(&id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> CategoryResult<Option<Category>> {
        let store = self.state.read().await;
        Ok(store.rows.values().find(|c| c.slug == slug).cloned())
    }

    async fn exists_by_name_and_level(&self, name: &str, level: i32) -> CategoryResult<bool> {
        let store = self.state.read().await;
        Ok(store
            .rows
            .values()
            .any(|c| c.name == name && c.level == level))
    }

    async fn exists_by_slug(&self, slug: &str) -> CategoryResult<bool> {
        let store = self.state.read().await;
        Ok(store.rows.values().any(|c| c.slug == slug))
    }

    async fn has_children(&self, id: i32) -> CategoryResult<bool> {
        let store = self.state.read().await;
        Ok(store.has_children(id))
    }

    async fn create(&self, input: CreateCategory) -> CategoryResult<Category> {
        let mut store = self.state.write().await;
        let input = UpdateCategory::from(input);
        store.check_constraints(None, &input)?;

        store.next_id += 1;
        let category = Category {
            id: store.next_id,
            name: input.name,
            slug: input.slug,
            is_active: input.is_active,
            level: input.level,
            parent_id: input.parent_id,
        };
        store.rows.insert(category.id, category.clone());

        tracing::info!(category_id = category.id, "Created category");
        Ok(category)
    }

    async fn update(&self, id: i32, input: UpdateCategory) -> CategoryResult<Option<Category>> {
        let mut store = self.state.write().await;
        if !store.rows.contains_key(&id) {
            return Ok(None);
        }
        store.check_constraints(Some(id), &input)?;

        let Some(category) = store.rows.get_mut(&id) else {
            return Ok(None);
        };
        category.replace_with(input);

        tracing::info!(category_id = id, "Updated category");
        Ok(Some(category.clone()))
    }

    async fn delete(&self, id: i32) -> CategoryResult<bool> {
        let mut store = self.state.write().await;
        if store.has_children(id) {
            return Err(CategoryError::HasChildren(id));
        }
        let removed = store.rows.remove(&id).is_some();

        if removed {
            tracing::info!(category_id = id, "Deleted category");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_are_assigned_in_order() {
        let repo = InMemoryCategoryRepository::new();
        let first = repo.create(CreateCategory::new("A", "a")).await.unwrap();
        let second = repo.create(CreateCategory::new("B", "b")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.list().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_create_with_unknown_parent_fails() {
        let repo = InMemoryCategoryRepository::new();
        let err = repo
            .create(CreateCategory::new("Phones", "phones").under(42, 200))
            .await
            .unwrap_err();

        assert_eq!(err, CategoryError::ParentNotFound);
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_may_keep_its_own_slug() {
        let repo = InMemoryCategoryRepository::new();
        let created = repo.create(CreateCategory::new("A", "a")).await.unwrap();

        let update = UpdateCategory::from(CreateCategory::new("A renamed", "a").active());
        let updated = repo.update(created.id, update).await.unwrap().unwrap();

        assert_eq!(updated.name, "A renamed");
        assert!(updated.is_active);
    }

    #[tokio::test]
    async fn test_update_into_another_slug_conflicts() {
        let repo = InMemoryCategoryRepository::new();
        repo.create(CreateCategory::new("A", "a")).await.unwrap();
        let b = repo.create(CreateCategory::new("B", "b")).await.unwrap();

        let err = repo
            .update(b.id, UpdateCategory::from(CreateCategory::new("B", "a")))
            .await
            .unwrap_err();
        assert_eq!(err, CategoryError::SlugTaken("a".into()));
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = InMemoryCategoryRepository::new();
        let result = repo
            .update(9, UpdateCategory::from(CreateCategory::new("A", "a")))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_self_reference_is_not_a_child() {
        let repo = InMemoryCategoryRepository::new();
        let looped = repo.create(CreateCategory::new("A", "a")).await.unwrap();
        repo.update(looped.id, UpdateCategory::from(CreateCategory::new("A", "a").under(looped.id, 100)))
            .await
            .unwrap();

        assert!(!repo.has_children(looped.id).await.unwrap());
        assert!(repo.delete(looped.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_parent_is_restricted() {
        let repo = InMemoryCategoryRepository::new();
        let parent = repo.create(CreateCategory::new("A", "a")).await.unwrap();
        repo.create(CreateCategory::new("B", "b").under(parent.id, 200))
            .await
            .unwrap();

        assert_eq!(
            repo.delete(parent.id).await.unwrap_err(),
            CategoryError::HasChildren(parent.id)
        );
        assert!(!repo.delete(99).await.unwrap());
    }
}
