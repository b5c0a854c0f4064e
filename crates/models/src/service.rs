//! Offered services; each may own subservices and a gallery.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::{Form, FormLimits};
use crate::record::{FieldKind, FieldValue, Record, SortOrder};
use crate::subservice;
use crate::validation::{clean, clean_opt, ValidationErrors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub summary: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub icon: Option<String>,
    pub cover_image: Option<String>,
    pub position: i32,
    pub published: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Subservice }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Subservice => Entity::has_many(subservice::Entity).into(),
        }
    }
}

impl Related<subservice::Entity> for Entity {
    fn to() -> RelationDef { Relation::Subservice.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Record for Model {
    const KIND: &'static str = "service";
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "slug", "summary"];
    const SORT_COLUMNS: &'static [&'static str] =
        &["title", "slug", "position", "published", "created_at", "updated_at"];
    const FILTER_COLUMNS: &'static [(&'static str, FieldKind)] = &[("published", FieldKind::Bool)];
    const DEFAULT_SORT: (&'static str, SortOrder) = ("position", SortOrder::Asc);

    fn id(&self) -> Uuid { self.id }

    fn slug(&self) -> Option<&str> { Some(&self.slug) }

    fn field(&self, column: &str) -> Option<FieldValue> {
        Some(match column {
            "id" => self.id.into(),
            "title" => self.title.as_str().into(),
            "slug" => self.slug.as_str().into(),
            "summary" => self.summary.as_deref().into(),
            "description" => self.description.as_str().into(),
            "icon" => self.icon.as_deref().into(),
            "cover_image" => self.cover_image.as_deref().into(),
            "position" => self.position.into(),
            "published" => self.published.into(),
            "created_at" => self.created_at.into(),
            "updated_at" => self.updated_at.into(),
            _ => return None,
        })
    }

    fn touch(&mut self, now: DateTimeWithTimeZone) { self.updated_at = now; }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceForm {
    pub title: String,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub description: String,
    pub icon: Option<String>,
    pub cover_image: Option<String>,
    pub position: i32,
    pub published: bool,
    pub gallery: Vec<String>,
}

impl Form for ServiceForm {
    type Model = Model;
    const FIELDS: &'static [&'static str] = &[
        "title", "slug", "summary", "description", "icon", "cover_image",
        "position", "published", "gallery",
    ];

    fn validate(&self, limits: &FormLimits) -> ValidationErrors {
        let mut errs = ValidationErrors::new();
        errs.require_text("title", &self.title, 160);
        errs.optional_text("summary", self.summary.as_deref(), 300);
        if self.description.trim().is_empty() {
            errs.push("description", "is required");
        }
        errs.optional_text("icon", self.icon.as_deref(), 64);
        errs.optional_image_url("cover_image", self.cover_image.as_deref());
        errs.non_negative("position", self.position);
        errs.gallery("gallery", &self.gallery, limits.gallery_max_images);
        errs
    }

    fn slug_source(&self) -> Option<&str> { Some(&self.title) }

    fn requested_slug(&self) -> Option<&str> { self.slug.as_deref() }

    fn gallery(&self) -> Option<&[String]> { Some(&self.gallery) }

    fn build(self, id: Uuid, slug: Option<String>, now: DateTimeWithTimeZone) -> Model {
        Model {
            id,
            title: clean(&self.title),
            slug: slug.unwrap_or_default(),
            summary: clean_opt(self.summary),
            description: self.description,
            icon: clean_opt(self.icon),
            cover_image: clean_opt(self.cover_image),
            position: self.position,
            published: self.published,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(self, current: Model, slug: Option<String>, now: DateTimeWithTimeZone) -> Model {
        Model {
            title: clean(&self.title),
            slug: slug.unwrap_or(current.slug),
            summary: clean_opt(self.summary),
            description: self.description,
            icon: clean_opt(self.icon),
            cover_image: clean_opt(self.cover_image),
            position: self.position,
            published: self.published,
            updated_at: now,
            ..current
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_position_is_rejected() {
        let form = ServiceForm { title: "Audits".into(), description: "d".into(), position: -1, ..Default::default() };
        let errs = form.validate(&FormLimits::default());
        assert_eq!(errs.message_for("position"), Some("must be zero or greater"));
    }
}
