use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::{Form, FormLimits, ParentRef};
use crate::record::{FieldKind, FieldValue, Record, SortOrder};
use crate::service;
use crate::validation::{clean, clean_opt, ValidationErrors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subservice")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub summary: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub position: i32,
    pub published: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Service }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::belongs_to(service::Entity)
                .from(Column::ServiceId)
                .to(service::Column::Id)
                .into(),
        }
    }
}

impl Related<service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Record for Model {
    const KIND: &'static str = "subservice";
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "slug", "summary"];
    const SORT_COLUMNS: &'static [&'static str] =
        &["title", "slug", "position", "published", "created_at", "updated_at"];
    const FILTER_COLUMNS: &'static [(&'static str, FieldKind)] =
        &[("service_id", FieldKind::Uuid), ("published", FieldKind::Bool)];
    const DEFAULT_SORT: (&'static str, SortOrder) = ("position", SortOrder::Asc);

    fn id(&self) -> Uuid { self.id }

    fn slug(&self) -> Option<&str> { Some(&self.slug) }

    fn field(&self, column: &str) -> Option<FieldValue> {
        Some(match column {
            "id" => self.id.into(),
            "service_id" => self.service_id.into(),
            "title" => self.title.as_str().into(),
            "slug" => self.slug.as_str().into(),
            "summary" => self.summary.as_deref().into(),
            "description" => self.description.as_str().into(),
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
pub struct SubserviceForm {
    pub service_id: Option<Uuid>,
    pub title: String,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub description: String,
    pub position: i32,
    pub published: bool,
}

impl Form for SubserviceForm {
    type Model = Model;
    const FIELDS: &'static [&'static str] =
        &["service_id", "title", "slug", "summary", "description", "position", "published"];

    fn validate(&self, _limits: &FormLimits) -> ValidationErrors {
        let mut errs = ValidationErrors::new();
        if self.service_id.is_none() {
            errs.push("service_id", "is required");
        }
        errs.require_text("title", &self.title, 160);
        errs.optional_text("summary", self.summary.as_deref(), 300);
        if self.description.trim().is_empty() {
            errs.push("description", "is required");
        }
        errs.non_negative("position", self.position);
        errs
    }

    fn slug_source(&self) -> Option<&str> { Some(&self.title) }

    fn requested_slug(&self) -> Option<&str> { self.slug.as_deref() }

    fn parent(&self) -> Option<ParentRef> {
        self.service_id.map(|id| ParentRef { field: "service_id", id })
    }

    fn build(self, id: Uuid, slug: Option<String>, now: DateTimeWithTimeZone) -> Model {
        Model {
            id,
            service_id: self.service_id.unwrap_or_default(),
            title: clean(&self.title),
            slug: slug.unwrap_or_default(),
            summary: clean_opt(self.summary),
            description: self.description,
            position: self.position,
            published: self.published,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(self, current: Model, slug: Option<String>, now: DateTimeWithTimeZone) -> Model {
        Model {
            service_id: self.service_id.unwrap_or(current.service_id),
            title: clean(&self.title),
            slug: slug.unwrap_or(current.slug),
            summary: clean_opt(self.summary),
            description: self.description,
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
    fn service_is_required_and_focused_first() {
        let errs = SubserviceForm::default().validate(&FormLimits::default());
        let fields: Vec<&str> = errs.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["service_id", "title", "description"]);
    }
}
