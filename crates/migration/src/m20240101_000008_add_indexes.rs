use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Blog: public listing filters on published and sorts by published_at
        manager
            .create_index(
                Index::create()
                    .name("idx_blog_published")
                    .table(Blog::Table)
                    .col(Blog::Published)
                    .col(Blog::PublishedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blog_category")
                    .table(Blog::Table)
                    .col(Blog::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_project_category")
                    .table(Project::Table)
                    .col(Project::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subservice_service")
                    .table(Subservice::Table)
                    .col(Subservice::ServiceId)
                    .col(Subservice::Position)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lead_status_created")
                    .table(Lead::Table)
                    .col(Lead::Status)
                    .col(Lead::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Gallery: every read is "all images of one owner, in order"
        manager
            .create_index(
                Index::create()
                    .name("idx_gallery_owner_position")
                    .table(GalleryImage::Table)
                    .col(GalleryImage::OwnerKind)
                    .col(GalleryImage::OwnerId)
                    .col(GalleryImage::Position)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_gallery_owner_position").table(GalleryImage::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_lead_status_created").table(Lead::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_subservice_service").table(Subservice::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_project_category").table(Project::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_blog_category").table(Blog::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_blog_published").table(Blog::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Blog { Table, Published, PublishedAt, CategoryId }

#[derive(DeriveIden)]
enum Project { Table, CategoryId }

#[derive(DeriveIden)]
enum Subservice { Table, ServiceId, Position }

#[derive(DeriveIden)]
enum Lead { Table, Status, CreatedAt }

#[derive(DeriveIden)]
enum GalleryImage { Table, OwnerKind, OwnerId, Position }
