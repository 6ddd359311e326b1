use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(pk_auto(Category::Id))
                    .col(string_len(Category::Name, 100))
                    .col(string_len(Category::Slug, 120))
                    .col(boolean(Category::IsActive).default(false))
                    .col(integer(Category::Level).default(100))
                    .col(integer_null(Category::ParentId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_parent_id")
                            .from(Category::Table, Category::ParentId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_category_name_level")
                    .table(Category::Table)
                    .col(Category::Name)
                    .col(Category::Level)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_category_slug")
                    .table(Category::Table)
                    .col(Category::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_category_parent_id")
                    .table(Category::Table)
                    .col(Category::ParentId)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                ALTER TABLE category
                    ADD CONSTRAINT category_name_length_check CHECK (LENGTH(name) > 0),
                    ADD CONSTRAINT category_slug_length_check CHECK (LENGTH(slug) > 0)
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Category {
    Table,
    Id,
    Name,
    Slug,
    IsActive,
    Level,
    ParentId,
}
