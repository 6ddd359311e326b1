use std::sync::Arc;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, CategoryDeleted, CreateCategory, UpdateCategory};
use crate::repository::CategoryRepository;
use crate::rules;

/// Category service, generic over its storage
#[derive(Clone)]
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list(&self) -> CategoryResult<Vec<Category>> {
        self.repository.list().await
    }

    pub async fn get(&self, id: i32) -> CategoryResult<Category> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| CategoryError::DoesNotExist(format!("id={}", id)))
    }

    pub async fn get_by_slug(&self, slug: &str) -> CategoryResult<Category> {
        self.repository
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| CategoryError::DoesNotExist(format!("slug={}", slug)))
    }

    /// Create a category after the uniqueness rules pass.
    pub async fn create(&self, input: CreateCategory) -> CategoryResult<Category> {
        rules::check_existing(self.repository.as_ref(), &input).await?;
        self.repository.create(input).await
    }

    /// Full replace. Uniqueness is left to the database constraints; a parent
    /// that would close a loop in the hierarchy is refused here.
    pub async fn update(&self, id: i32, input: UpdateCategory) -> CategoryResult<Category> {
        if input.parent_id.is_some() {
            if self.repository.get_by_id(id).await?.is_none() {
                return Err(CategoryError::NotFound(id));
            }
            rules::check_ancestry(self.repository.as_ref(), id, input.parent_id).await?;
        }

        self.repository
            .update(id, input)
            .await?
            .ok_or(CategoryError::NotFound(id))
    }

    /// Delete a leaf category and return its id and name.
    pub async fn delete(&self, id: i32) -> CategoryResult<CategoryDeleted> {
        let category = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(CategoryError::NotFound(id))?;

        if self.repository.has_children(id).await? {
            return Err(CategoryError::HasChildren(id));
        }

        if !self.repository.delete(id).await? {
            return Err(CategoryError::NotFound(id));
        }

        Ok(category.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCategoryRepository;
    use mockall::predicate::*;

    fn electronics() -> Category {
        Category {
            id: 5,
            name: "Electronics".to_string(),
            slug: "electronics".to_string(),
            is_active: true,
            level: 100,
            parent_id: None,
        }
    }

    #[tokio::test]
    async fn test_get_missing_is_does_not_exist() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(3))
            .returning(|_| Ok(None));

        let service = CategoryService::new(mock_repo);
        let err = service.get(3).await.unwrap_err();
        assert!(matches!(err, CategoryError::DoesNotExist(_)));
    }

    #[tokio::test]
    async fn test_get_by_slug_found() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo
            .expect_get_by_slug()
            .with(eq("electronics"))
            .returning(|_| Ok(Some(electronics())));

        let service = CategoryService::new(mock_repo);
        assert_eq!(service.get_by_slug("electronics").await.unwrap(), electronics());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name_and_level_without_insert() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo
            .expect_exists_by_name_and_level()
            .with(eq("Electronics"), eq(100))
            .returning(|_, _| Ok(true));
        mock_repo.expect_exists_by_slug().never();
        mock_repo.expect_create().never();

        let service = CategoryService::new(mock_repo);
        let err = service
            .create(CreateCategory::new("Electronics", "electronics-2"))
            .await
            .unwrap_err();

        assert!(matches!(err, CategoryError::NameLevelTaken { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_slug() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo
            .expect_exists_by_name_and_level()
            .returning(|_, _| Ok(false));
        mock_repo
            .expect_exists_by_slug()
            .with(eq("electronics"))
            .returning(|_| Ok(true));
        mock_repo.expect_create().never();

        let service = CategoryService::new(mock_repo);
        let err = service
            .create(CreateCategory::new("Gadgets", "electronics"))
            .await
            .unwrap_err();

        assert_eq!(err, CategoryError::SlugTaken("electronics".into()));
    }

    #[tokio::test]
    async fn test_create_success() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo
            .expect_exists_by_name_and_level()
            .returning(|_, _| Ok(false));
        mock_repo.expect_exists_by_slug().returning(|_| Ok(false));
        mock_repo
            .expect_create()
            .times(1)
            .returning(|_| Ok(electronics()));

        let service = CategoryService::new(mock_repo);
        let created = service
            .create(CreateCategory::new("Electronics", "electronics").active())
            .await
            .unwrap();

        assert_eq!(created.id, 5);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo.expect_update().returning(|_, _| Ok(None));

        let service = CategoryService::new(mock_repo);
        let update = UpdateCategory::from(CreateCategory::new("X", "x"));
        assert_eq!(
            service.update(8, update).await.unwrap_err(),
            CategoryError::NotFound(8)
        );
    }

    #[tokio::test]
    async fn test_update_skips_uniqueness_precheck() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo.expect_exists_by_name_and_level().never();
        mock_repo.expect_exists_by_slug().never();
        mock_repo
            .expect_update()
            .with(eq(5), always())
            .returning(|_, _| Ok(Some(electronics())));

        let service = CategoryService::new(mock_repo);
        let update = UpdateCategory::from(CreateCategory::new("Electronics", "electronics"));
        assert!(service.update(5, update).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_refuses_self_as_parent() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(5))
            .returning(|_| Ok(Some(electronics())));
        mock_repo.expect_update().never();

        let service = CategoryService::new(mock_repo);
        let update = UpdateCategory::from(CreateCategory::new("Electronics", "electronics").under(5, 200));
        assert_eq!(
            service.update(5, update).await.unwrap_err(),
            CategoryError::ParentCycle(5)
        );
    }

    #[tokio::test]
    async fn test_update_missing_with_parent_is_not_found() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo.expect_get_by_id().with(eq(8)).returning(|_| Ok(None));
        mock_repo.expect_update().never();

        let service = CategoryService::new(mock_repo);
        let update = UpdateCategory::from(CreateCategory::new("X", "x").under(8, 200));
        assert_eq!(
            service.update(8, update).await.unwrap_err(),
            CategoryError::NotFound(8)
        );
    }

    #[tokio::test]
    async fn test_delete_returns_id_and_name() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(5))
            .returning(|_| Ok(Some(electronics())));
        mock_repo.expect_has_children().returning(|_| Ok(false));
        mock_repo.expect_delete().with(eq(5)).returning(|_| Ok(true));

        let service = CategoryService::new(mock_repo);
        let deleted = service.delete(5).await.unwrap();

        assert_eq!(
            deleted,
            CategoryDeleted {
                id: 5,
                name: "Electronics".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_delete_with_children_is_refused() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(|_| Ok(Some(electronics())));
        mock_repo.expect_has_children().with(eq(5)).returning(|_| Ok(true));
        mock_repo.expect_delete().never();

        let service = CategoryService::new(mock_repo);
        assert_eq!(
            service.delete(5).await.unwrap_err(),
            CategoryError::HasChildren(5)
        );
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo.expect_get_by_id().returning(|_| Ok(None));

        let service = CategoryService::new(mock_repo);
        assert_eq!(service.delete(1).await.unwrap_err(), CategoryError::NotFound(1));
    }

    #[tokio::test]
    async fn test_repository_errors_pass_through() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo
            .expect_list()
            .returning(|| Err(CategoryError::Internal("pool timed out".into())));

        let service = CategoryService::new(mock_repo);
        assert!(matches!(
            service.list().await.unwrap_err(),
            CategoryError::Internal(_)
        ));
    }
}
