use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

use crate::{
    entity,
    error::UserResult,
    models::{NewUser, User},
    repository::UserRepository,
};

#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(model.map(Into::into))
    }

    async fn username_exists(&self, username: &str) -> UserResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::Username.eq(username))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn create(&self, user: NewUser) -> UserResult<User> {
        let txn = self.db.begin().await?;

        let active_model: entity::ActiveModel = user.into();
        let model = active_model.insert(&txn).await?;
        txn.commit().await?;

        tracing::info!(user_id = model.id, username = %model.username, "Created user");
        Ok(model.into())
    }

    async fn update(&self, user: User) -> UserResult<Option<User>> {
        let txn = self.db.begin().await?;

        if entity::Entity::find_by_id(user.id).one(&txn).await?.is_none() {
            return Ok(None);
        }

        let id = user.id;
        let active_model: entity::ActiveModel = user.into();
        let model = active_model.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(user_id = id, "Updated user");
        Ok(Some(model.into()))
    }

    async fn delete(&self, id: i32) -> UserResult<bool> {
        let txn = self.db.begin().await?;
        let result = entity::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            tracing::info!(user_id = id, "Deleted user");
        }
        Ok(removed)
    }
}
