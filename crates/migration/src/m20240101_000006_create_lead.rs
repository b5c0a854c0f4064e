//! Create `lead` table.
//! Rows come from the public contact form; `status` is managed by admins.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lead::Table)
                    .if_not_exists()
                    .col(uuid(Lead::Id).primary_key())
                    .col(string_len(Lead::Name, 120))
                    .col(string_len(Lead::Email, 254))
                    .col(string_len_null(Lead::Phone, 32))
                    .col(string_len_null(Lead::Company, 120))
                    .col(text(Lead::Message))
                    .col(string_len_null(Lead::Source, 64))
                    .col(string_len(Lead::Status, 16).default("new"))
                    .col(text_null(Lead::Notes))
                    .col(timestamp_with_time_zone(Lead::CreatedAt))
                    .col(timestamp_with_time_zone(Lead::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Lead::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Lead {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Company,
    Message,
    Source,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}
