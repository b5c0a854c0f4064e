use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category;
use crate::form::{Form, FormLimits, ParentRef};
use crate::record::{FieldKind, FieldValue, Record, SortOrder};
use crate::validation::{clean, clean_opt, ValidationErrors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub summary: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub client: Option<String>,
    pub cover_image: Option<String>,
    pub category_id: Option<Uuid>,
    pub featured: bool,
    pub published: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Category }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Category => Entity::belongs_to(category::Entity)
                .from(Column::CategoryId)
                .to(category::Column::Id)
                .into(),
        }
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Record for Model {
    const KIND: &'static str = "project";
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "slug", "summary", "client"];
    const SORT_COLUMNS: &'static [&'static str] =
        &["title", "slug", "client", "featured", "published", "created_at", "updated_at"];
    const FILTER_COLUMNS: &'static [(&'static str, FieldKind)] = &[
        ("category_id", FieldKind::Uuid),
        ("featured", FieldKind::Bool),
        ("published", FieldKind::Bool),
    ];
    const DEFAULT_SORT: (&'static str, SortOrder) = ("created_at", SortOrder::Desc);

    fn id(&self) -> Uuid { self.id }

    fn slug(&self) -> Option<&str> { Some(&self.slug) }

    fn field(&self, column: &str) -> Option<FieldValue> {
        Some(match column {
            "id" => self.id.into(),
            "title" => self.title.as_str().into(),
            "slug" => self.slug.as_str().into(),
            "summary" => self.summary.as_deref().into(),
            "description" => self.description.as_str().into(),
            "client" => self.client.as_deref().into(),
            "cover_image" => self.cover_image.as_deref().into(),
            "category_id" => self.category_id.into(),
            "featured" => self.featured.into(),
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
pub struct ProjectForm {
    pub title: String,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub description: String,
    pub client: Option<String>,
    pub cover_image: Option<String>,
    pub category_id: Option<Uuid>,
    pub featured: bool,
    pub published: bool,
    /// Ordered image URLs; the first one is shown first.
    pub gallery: Vec<String>,
}

impl Form for ProjectForm {
    type Model = Model;
    const FIELDS: &'static [&'static str] = &[
        "title", "slug", "summary", "description", "client", "cover_image",
        "category_id", "featured", "published", "gallery",
    ];

    fn validate(&self, limits: &FormLimits) -> ValidationErrors {
        let mut errs = ValidationErrors::new();
        errs.require_text("title", &self.title, 160);
        errs.optional_text("summary", self.summary.as_deref(), 300);
        if self.description.trim().is_empty() {
            errs.push("description", "is required");
        }
        errs.optional_text("client", self.client.as_deref(), 120);
        errs.optional_image_url("cover_image", self.cover_image.as_deref());
        errs.gallery("gallery", &self.gallery, limits.gallery_max_images);
        errs
    }

    fn slug_source(&self) -> Option<&str> { Some(&self.title) }

    fn requested_slug(&self) -> Option<&str> { self.slug.as_deref() }

    fn parent(&self) -> Option<ParentRef> {
        self.category_id.map(|id| ParentRef { field: "category_id", id })
    }

    fn gallery(&self) -> Option<&[String]> { Some(&self.gallery) }

    fn build(self, id: Uuid, slug: Option<String>, now: DateTimeWithTimeZone) -> Model {
        Model {
            id,
            title: clean(&self.title),
            slug: slug.unwrap_or_default(),
            summary: clean_opt(self.summary),
            description: self.description,
            client: clean_opt(self.client),
            cover_image: clean_opt(self.cover_image),
            category_id: self.category_id,
            featured: self.featured,
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
            client: clean_opt(self.client),
            cover_image: clean_opt(self.cover_image),
            category_id: self.category_id,
            featured: self.featured,
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
    fn gallery_limit_comes_from_config() {
        let form = ProjectForm {
            title: "Harbor".into(),
            description: "Refit".into(),
            gallery: vec!["/a.jpg".into(), "/b.jpg".into(), "/c.jpg".into()],
            ..Default::default()
        };
        let tight = FormLimits { gallery_max_images: 2, ..FormLimits::default() };
        assert_eq!(form.validate(&tight).focus(), Some("gallery"));
        assert!(form.validate(&FormLimits::default()).is_empty());
    }

    #[test]
    fn unknown_field_is_none() {
        let form = ProjectForm { title: "Harbor".into(), description: "Refit".into(), ..Default::default() };
        let m = form.build(Uuid::new_v4(), Some("harbor".into()), chrono::Utc::now().into());
        assert!(m.field("nope").is_none());
        assert_eq!(m.field("featured"), Some(FieldValue::Bool(false)));
    }
}
