use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category;
use crate::form::{Form, FormLimits, ParentRef};
use crate::record::{FieldKind, FieldValue, Record, SortOrder};
use crate::validation::{clean, clean_opt, ValidationErrors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blog")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub excerpt: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub cover_image: Option<String>,
    pub category_id: Option<Uuid>,
    pub author: Option<String>,
    pub published: bool,
    pub published_at: Option<DateTimeWithTimeZone>,
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
    const KIND: &'static str = "blog";
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "slug", "excerpt", "author"];
    const SORT_COLUMNS: &'static [&'static str] =
        &["title", "slug", "author", "published", "published_at", "created_at", "updated_at"];
    const FILTER_COLUMNS: &'static [(&'static str, FieldKind)] =
        &[("category_id", FieldKind::Uuid), ("published", FieldKind::Bool), ("author", FieldKind::Text)];
    const DEFAULT_SORT: (&'static str, SortOrder) = ("created_at", SortOrder::Desc);

    fn id(&self) -> Uuid { self.id }

    fn slug(&self) -> Option<&str> { Some(&self.slug) }

    fn field(&self, column: &str) -> Option<FieldValue> {
        Some(match column {
            "id" => self.id.into(),
            "title" => self.title.as_str().into(),
            "slug" => self.slug.as_str().into(),
            "excerpt" => self.excerpt.as_deref().into(),
            "content" => self.content.as_str().into(),
            "cover_image" => self.cover_image.as_deref().into(),
            "category_id" => self.category_id.into(),
            "author" => self.author.as_deref().into(),
            "published" => self.published.into(),
            "published_at" => self.published_at.into(),
            "created_at" => self.created_at.into(),
            "updated_at" => self.updated_at.into(),
            _ => return None,
        })
    }

    fn touch(&mut self, now: DateTimeWithTimeZone) { self.updated_at = now; }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogForm {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub category_id: Option<Uuid>,
    pub author: Option<String>,
    pub published: bool,
}

impl Form for BlogForm {
    type Model = Model;
    const FIELDS: &'static [&'static str] =
        &["title", "slug", "excerpt", "content", "cover_image", "category_id", "author", "published"];

    fn validate(&self, _limits: &FormLimits) -> ValidationErrors {
        let mut errs = ValidationErrors::new();
        errs.require_text("title", &self.title, 160);
        errs.optional_text("excerpt", self.excerpt.as_deref(), 300);
        if self.content.trim().is_empty() {
            errs.push("content", "is required");
        }
        errs.optional_image_url("cover_image", self.cover_image.as_deref());
        errs.optional_text("author", self.author.as_deref(), 80);
        errs
    }

    fn slug_source(&self) -> Option<&str> { Some(&self.title) }

    fn requested_slug(&self) -> Option<&str> { self.slug.as_deref() }

    fn parent(&self) -> Option<ParentRef> {
        self.category_id.map(|id| ParentRef { field: "category_id", id })
    }

    fn build(self, id: Uuid, slug: Option<String>, now: DateTimeWithTimeZone) -> Model {
        Model {
            id,
            title: clean(&self.title),
            slug: slug.unwrap_or_default(),
            excerpt: clean_opt(self.excerpt),
            content: self.content,
            cover_image: clean_opt(self.cover_image),
            category_id: self.category_id,
            author: clean_opt(self.author),
            published: self.published,
            published_at: self.published.then_some(now),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(self, current: Model, slug: Option<String>, now: DateTimeWithTimeZone) -> Model {
        // first publication stamps published_at; unpublishing keeps the history
        let published_at = match (self.published, current.published_at) {
            (true, None) => Some(now),
            (_, at) => at,
        };
        Model {
            title: clean(&self.title),
            slug: slug.unwrap_or(current.slug),
            excerpt: clean_opt(self.excerpt),
            content: self.content,
            cover_image: clean_opt(self.cover_image),
            category_id: self.category_id,
            author: clean_opt(self.author),
            published: self.published,
            published_at,
            updated_at: now,
            ..current
        }
    }
}
