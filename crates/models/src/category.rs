use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::{Form, FormLimits};
use crate::record::{FieldKind, FieldValue, Record, SortOrder};
use crate::validation::{clean, clean_opt, ValidationErrors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

impl Record for Model {
    const KIND: &'static str = "category";
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "slug", "description"];
    const SORT_COLUMNS: &'static [&'static str] = &["name", "slug", "created_at", "updated_at"];
    const FILTER_COLUMNS: &'static [(&'static str, FieldKind)] = &[];
    const DEFAULT_SORT: (&'static str, SortOrder) = ("name", SortOrder::Asc);

    fn id(&self) -> Uuid { self.id }

    fn slug(&self) -> Option<&str> { Some(&self.slug) }

    fn field(&self, column: &str) -> Option<FieldValue> {
        Some(match column {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "slug" => self.slug.as_str().into(),
            "description" => self.description.as_deref().into(),
            "created_at" => self.created_at.into(),
            "updated_at" => self.updated_at.into(),
            _ => return None,
        })
    }

    fn touch(&mut self, now: DateTimeWithTimeZone) { self.updated_at = now; }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryForm {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
}

impl Form for CategoryForm {
    type Model = Model;
    const FIELDS: &'static [&'static str] = &["name", "slug", "description"];

    fn validate(&self, _limits: &FormLimits) -> ValidationErrors {
        let mut errs = ValidationErrors::new();
        errs.require_text("name", &self.name, 80);
        errs.optional_text("description", self.description.as_deref(), 500);
        errs
    }

    fn slug_source(&self) -> Option<&str> { Some(&self.name) }

    fn requested_slug(&self) -> Option<&str> { self.slug.as_deref() }

    fn build(self, id: Uuid, slug: Option<String>, now: DateTimeWithTimeZone) -> Model {
        Model {
            id,
            name: clean(&self.name),
            slug: slug.unwrap_or_default(),
            description: clean_opt(self.description),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(self, current: Model, slug: Option<String>, now: DateTimeWithTimeZone) -> Model {
        Model {
            name: clean(&self.name),
            slug: slug.unwrap_or(current.slug),
            description: clean_opt(self.description),
            updated_at: now,
            ..current
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn validate_reports_name() {
        let form = CategoryForm { name: " ".into(), ..Default::default() };
        let errs = form.validate(&FormLimits::default());
        assert_eq!(errs.focus(), Some("name"));
    }

    #[test]
    fn apply_keeps_identity() {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let created = CategoryForm { name: " Design ".into(), ..Default::default() }
            .build(Uuid::new_v4(), Some("design".into()), now);
        assert_eq!(created.name, "Design");
        let later: DateTimeWithTimeZone = (Utc::now() + chrono::Duration::seconds(5)).into();
        let edited = CategoryForm { name: "UX Design".into(), description: Some("  ".into()), ..Default::default() }
            .apply(created.clone(), None, later);
        assert_eq!(edited.id, created.id);
        assert_eq!(edited.slug, "design");
        assert_eq!(edited.created_at, created.created_at);
        assert_eq!(edited.updated_at, later);
        assert_eq!(edited.description, None);
    }
}
