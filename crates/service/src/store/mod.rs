//! Record persistence behind one trait, so the content service and the HTTP
//! layer never see which backend holds the rows.

use async_trait::async_trait;
use common::pagination::Page;
use models::Record;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::listing::ListQuery;

pub mod memory;
pub mod seaorm;

pub use memory::MemoryStore;
pub use seaorm::SeaOrmStore;

/// Table-like storage for one record type.
#[async_trait]
pub trait RecordStore<M: Record>: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Page<M>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<M>, ServiceError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<M>, ServiceError>;
    async fn insert(&self, record: M) -> Result<M, ServiceError>;
    /// Replace the row with the same id; a missing row is `NotFound`.
    async fn update(&self, record: M) -> Result<M, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}
