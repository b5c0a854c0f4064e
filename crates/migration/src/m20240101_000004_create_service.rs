//! Create `service` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(uuid(Service::Id).primary_key())
                    .col(string_len(Service::Title, 160))
                    .col(string_len(Service::Slug, 128).unique_key())
                    .col(string_len_null(Service::Summary, 300))
                    .col(text(Service::Description))
                    .col(string_len_null(Service::Icon, 64))
                    .col(string_len_null(Service::CoverImage, 1024))
                    .col(integer(Service::Position).default(0))
                    .col(boolean(Service::Published).default(false))
                    .col(timestamp_with_time_zone(Service::CreatedAt))
                    .col(timestamp_with_time_zone(Service::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Service::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Service {
    Table,
    Id,
    Title,
    Slug,
    Summary,
    Description,
    Icon,
    CoverImage,
    Position,
    Published,
    CreatedAt,
    UpdatedAt,
}
