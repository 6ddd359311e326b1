use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{Category, CreateCategory, UpdateCategory};

/// Sea-ORM Entity for the `category` table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub is_active: bool,
    pub level: i32,
    pub parent_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            is_active: model.is_active,
            level: model.level,
            parent_id: model.parent_id,
        }
    }
}

impl From<CreateCategory> for ActiveModel {
    fn from(input: CreateCategory) -> Self {
        ActiveModel {
            name: Set(input.name),
            slug: Set(input.slug),
            is_active: Set(input.is_active),
            level: Set(input.level),
            parent_id: Set(input.parent_id),
            ..Default::default()
        }
    }
}

impl ActiveModel {
    /// Every column set from `input`; nothing is carried over from the stored row.
    pub fn replace(id: i32, input: UpdateCategory) -> Self {
        ActiveModel {
            id: Set(id),
            name: Set(input.name),
            slug: Set(input.slug),
            is_active: Set(input.is_active),
            level: Set(input.level),
            parent_id: Set(input.parent_id),
        }
    }
}
