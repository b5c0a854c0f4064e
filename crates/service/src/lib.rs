//! Service layer: the generic content controller and its collaborators.
//! - `store`: record persistence (SeaORM or in-memory) behind one trait.
//! - `listing`: search / filter / sort / page queries.
//! - `content`: validation, slug rules and gallery sync around every write.
//! - `leads`: contact form intake and status workflow.

pub mod errors;
pub mod listing;
pub mod store;
pub mod gallery;
pub mod content;
pub mod leads;
pub mod metrics;
#[cfg(test)]
pub mod test_support;

pub use content::{ContentService, Entry, ParentLookup};
pub use errors::ServiceError;
pub use listing::{ListLimits, ListQuery};
