use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{NewUser, User};

/// Sea-ORM Entity for the `users` table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            hashed_password: model.hashed_password,
            is_active: model.is_active,
            is_superuser: model.is_superuser,
        }
    }
}

impl From<NewUser> for ActiveModel {
    fn from(user: NewUser) -> Self {
        ActiveModel {
            username: Set(user.username),
            email: Set(user.email),
            hashed_password: Set(user.hashed_password),
            is_active: Set(user.is_active),
            is_superuser: Set(user.is_superuser),
            ..Default::default()
        }
    }
}

impl From<User> for ActiveModel {
    fn from(user: User) -> Self {
        ActiveModel {
            id: Set(user.id),
            username: Set(user.username),
            email: Set(user.email),
            hashed_password: Set(user.hashed_password),
            is_active: Set(user.is_active),
            is_superuser: Set(user.is_superuser),
        }
    }
}
