//! Create `blog` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Blog::Table)
                    .if_not_exists()
                    .col(uuid(Blog::Id).primary_key())
                    .col(string_len(Blog::Title, 160))
                    .col(string_len(Blog::Slug, 128).unique_key())
                    .col(string_len_null(Blog::Excerpt, 300))
                    .col(text(Blog::Content))
                    .col(string_len_null(Blog::CoverImage, 1024))
                    .col(uuid_null(Blog::CategoryId))
                    .col(string_len_null(Blog::Author, 80))
                    .col(boolean(Blog::Published).default(false))
                    .col(timestamp_with_time_zone_null(Blog::PublishedAt))
                    .col(timestamp_with_time_zone(Blog::CreatedAt))
                    .col(timestamp_with_time_zone(Blog::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_category")
                            .from(Blog::Table, Blog::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Blog::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Blog {
    Table,
    Id,
    Title,
    Slug,
    Excerpt,
    Content,
    CoverImage,
    CategoryId,
    Author,
    Published,
    PublishedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Category { Table, Id }
