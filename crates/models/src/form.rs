//! Create/edit form contract shared by all slugged content types.

use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

use crate::record::Record;
use crate::validation::ValidationErrors;

/// Limits that come from configuration rather than from the form itself.
#[derive(Clone, Copy, Debug)]
pub struct FormLimits {
    pub slug_max_len: usize,
    pub gallery_max_images: usize,
}

impl Default for FormLimits {
    fn default() -> Self {
        Self { slug_max_len: crate::slug::DEFAULT_MAX_LEN, gallery_max_images: 24 }
    }
}

/// A referenced parent row that must exist before the form is saved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParentRef {
    /// Form field holding the reference, used for error reporting.
    pub field: &'static str,
    pub id: Uuid,
}

/// Body of a create or update request for one content type.
pub trait Form: Send + Sync + Sized + 'static {
    type Model: Record;

    /// Input order on screen; field errors are reported in this order.
    const FIELDS: &'static [&'static str];

    /// All failing fields. Slug availability is checked by the caller.
    fn validate(&self, limits: &FormLimits) -> ValidationErrors;

    /// Text a slug is derived from when none is given (title or name).
    fn slug_source(&self) -> Option<&str> { None }

    fn requested_slug(&self) -> Option<&str> { None }

    fn parent(&self) -> Option<ParentRef> { None }

    /// Ordered gallery image URLs, for types that own a gallery.
    fn gallery(&self) -> Option<&[String]> { None }

    /// Build a fresh row.
    fn build(self, id: Uuid, slug: Option<String>, now: DateTimeWithTimeZone) -> Self::Model;

    /// Replace the editable fields of `current`; id and creation time stay.
    fn apply(self, current: Self::Model, slug: Option<String>, now: DateTimeWithTimeZone) -> Self::Model;
}
