//! Create `project` table.
//! Gallery images live in `gallery_image` keyed by owner kind `project`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Project::Table)
                    .if_not_exists()
                    .col(uuid(Project::Id).primary_key())
                    .col(string_len(Project::Title, 160))
                    .col(string_len(Project::Slug, 128).unique_key())
                    .col(string_len_null(Project::Summary, 300))
                    .col(text(Project::Description))
                    .col(string_len_null(Project::Client, 120))
                    .col(string_len_null(Project::CoverImage, 1024))
                    .col(uuid_null(Project::CategoryId))
                    .col(boolean(Project::Featured).default(false))
                    .col(boolean(Project::Published).default(false))
                    .col(timestamp_with_time_zone(Project::CreatedAt))
                    .col(timestamp_with_time_zone(Project::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_category")
                            .from(Project::Table, Project::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Project::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Project {
    Table,
    Id,
    Title,
    Slug,
    Summary,
    Description,
    Client,
    CoverImage,
    CategoryId,
    Featured,
    Published,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Category { Table, Id }
