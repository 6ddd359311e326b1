use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};

use crate::{
    entity,
    error::{CategoryError, CategoryResult},
    models::{Category, CreateCategory, UpdateCategory},
    repository::CategoryRepository,
};

/// Postgres-backed repository. Writes run in their own transaction, which is
/// rolled back when dropped on an error path.
#[derive(Clone)]
pub struct PgCategoryRepository {
    db: DatabaseConnection,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_error(err: DbErr) -> CategoryError {
    CategoryError::from(err)
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> CategoryResult<Vec<Category>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: i32) -> CategoryResult<Option<Category>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn get_by_slug(&self, slug: &str) -> CategoryResult<Option<Category>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn exists_by_name_and_level(&self, name: &str, level: i32) -> CategoryResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::Name.eq(name))
            .filter(entity::Column::Level.eq(level))
            .count(&self.db)
            .await
            .map_err(db_error)?;

        Ok(count > 0)
    }

    async fn exists_by_slug(&self, slug: &str) -> CategoryResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::Slug.eq(slug))
            .count(&self.db)
            .await
            .map_err(db_error)?;

        Ok(count > 0)
    }

    async fn has_children(&self, id: i32) -> CategoryResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::ParentId.eq(id))
            .filter(entity::Column::Id.ne(id))
            .count(&self.db)
            .await
            .map_err(db_error)?;

        Ok(count > 0)
    }

    async fn create(&self, input: CreateCategory) -> CategoryResult<Category> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let active_model: entity::ActiveModel = input.into();
        let model = active_model.insert(&txn).await.map_err(db_error)?;
        txn.commit().await.map_err(db_error)?;

        tracing::info!(category_id = model.id, slug = %model.slug, "Created category");
        Ok(model.into())
    }

    async fn update(&self, id: i32, input: UpdateCategory) -> CategoryResult<Option<Category>> {
        let txn = self.db.begin().await.map_err(db_error)?;

        if entity::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .is_none()
        {
            return Ok(None);
        }

        let model = entity::ActiveModel::replace(id, input)
            .update(&txn)
            .await
            .map_err(db_error)?;
        txn.commit().await.map_err(db_error)?;

        tracing::info!(category_id = id, "Updated category");
        Ok(Some(model.into()))
    }

    async fn delete(&self, id: i32) -> CategoryResult<bool> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let result = entity::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|err| match db_error(err) {
                CategoryError::HasChildren(_) => CategoryError::HasChildren(id),
                other => other,
            })?;
        txn.commit().await.map_err(db_error)?;

        let removed = result.rows_affected > 0;
        if removed {
            tracing::info!(category_id = id, "Deleted category");
        }
        Ok(removed)
    }
}
