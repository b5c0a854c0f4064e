//! Create `gallery_image` join table.
//!
//! One row per image of a project or service gallery. `position` carries the
//! display order; it is deliberately not unique so a reorder can be applied
//! row by row inside one transaction.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GalleryImage::Table)
                    .if_not_exists()
                    .col(uuid(GalleryImage::Id).primary_key())
                    .col(string_len(GalleryImage::OwnerKind, 16))
                    .col(uuid(GalleryImage::OwnerId))
                    .col(string_len(GalleryImage::ImageUrl, 1024))
                    .col(integer(GalleryImage::Position))
                    .col(timestamp_with_time_zone(GalleryImage::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(GalleryImage::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum GalleryImage { Table, Id, OwnerKind, OwnerId, ImageUrl, Position, CreatedAt }
