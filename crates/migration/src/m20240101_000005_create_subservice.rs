//! Create `subservice` table; rows are removed together with their service.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subservice::Table)
                    .if_not_exists()
                    .col(uuid(Subservice::Id).primary_key())
                    .col(uuid(Subservice::ServiceId))
                    .col(string_len(Subservice::Title, 160))
                    .col(string_len(Subservice::Slug, 128).unique_key())
                    .col(string_len_null(Subservice::Summary, 300))
                    .col(text(Subservice::Description))
                    .col(integer(Subservice::Position).default(0))
                    .col(boolean(Subservice::Published).default(false))
                    .col(timestamp_with_time_zone(Subservice::CreatedAt))
                    .col(timestamp_with_time_zone(Subservice::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subservice_service")
                            .from(Subservice::Table, Subservice::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Subservice::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Subservice {
    Table,
    Id,
    ServiceId,
    Title,
    Slug,
    Summary,
    Description,
    Position,
    Published,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Service { Table, Id }
