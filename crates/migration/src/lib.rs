//! Migrator registering content tables in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_category;
mod m20240101_000002_create_blog;
mod m20240101_000003_create_project;
mod m20240101_000004_create_service;
mod m20240101_000005_create_subservice;
mod m20240101_000006_create_lead;
mod m20240101_000007_create_gallery_image;
mod m20240101_000008_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_category::Migration),
            Box::new(m20240101_000002_create_blog::Migration),
            Box::new(m20240101_000003_create_project::Migration),
            Box::new(m20240101_000004_create_service::Migration),
            Box::new(m20240101_000005_create_subservice::Migration),
            Box::new(m20240101_000006_create_lead::Migration),
            Box::new(m20240101_000007_create_gallery_image::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000008_add_indexes::Migration),
        ]
    }
}
