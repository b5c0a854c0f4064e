pub mod db;
pub mod validation;
pub mod slug;
pub mod record;
pub mod form;
pub mod category;
pub mod blog;
pub mod project;
pub mod service;
pub mod subservice;
pub mod lead;
pub mod gallery_image;

pub use form::{Form, FormLimits, ParentRef};
pub use record::{FieldKind, FieldValue, Record, SortOrder};
pub use validation::{FieldError, ValidationErrors};

#[cfg(test)]
mod tests;
