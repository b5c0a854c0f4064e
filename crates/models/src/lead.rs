//! Contact-form submissions and their follow-up workflow.

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::{Form, FormLimits};
use crate::record::{FieldKind, FieldValue, Record, SortOrder};
use crate::validation::{clean, clean_opt, ValidationErrors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lead")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub source: Option<String>,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
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
    const KIND: &'static str = "lead";
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "email", "company", "message"];
    const SORT_COLUMNS: &'static [&'static str] = &["name", "email", "company", "status", "created_at", "updated_at"];
    const FILTER_COLUMNS: &'static [(&'static str, FieldKind)] =
        &[("status", FieldKind::Choice(&LeadStatus::NAMES)), ("source", FieldKind::Text)];
    const DEFAULT_SORT: (&'static str, SortOrder) = ("created_at", SortOrder::Desc);

    fn id(&self) -> Uuid { self.id }

    fn field(&self, column: &str) -> Option<FieldValue> {
        Some(match column {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "phone" => self.phone.as_deref().into(),
            "company" => self.company.as_deref().into(),
            "message" => self.message.as_str().into(),
            "source" => self.source.as_deref().into(),
            "status" => self.status.as_str().into(),
            "notes" => self.notes.as_deref().into(),
            "created_at" => self.created_at.into(),
            "updated_at" => self.updated_at.into(),
            _ => return None,
        })
    }

    fn touch(&mut self, now: DateTimeWithTimeZone) { self.updated_at = now; }
}

/// Where a lead is in the follow-up process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Closed,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 4] =
        [LeadStatus::New, LeadStatus::Contacted, LeadStatus::Qualified, LeadStatus::Closed];
    pub const NAMES: [&'static str; 4] = ["new", "contacted", "qualified", "closed"];

    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for LeadStatus {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LeadStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationErrors::single("status", "must be one of new, contacted, qualified, closed"))
    }
}

/// Public contact form body.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: String,
    pub source: Option<String>,
}

impl Form for LeadForm {
    type Model = Model;
    const FIELDS: &'static [&'static str] = &["name", "email", "phone", "company", "message", "source"];

    fn validate(&self, _limits: &FormLimits) -> ValidationErrors {
        let mut errs = ValidationErrors::new();
        errs.require_text("name", &self.name, 120);
        errs.email("email", &self.email);
        errs.optional_phone("phone", self.phone.as_deref());
        errs.optional_text("company", self.company.as_deref(), 120);
        errs.require_text("message", &self.message, 5000);
        errs.optional_text("source", self.source.as_deref(), 64);
        errs
    }

    fn build(self, id: Uuid, _slug: Option<String>, now: DateTimeWithTimeZone) -> Model {
        Model {
            id,
            name: clean(&self.name),
            email: clean(&self.email).to_ascii_lowercase(),
            phone: clean_opt(self.phone),
            company: clean_opt(self.company),
            message: self.message.trim().to_string(),
            source: clean_opt(self.source),
            status: LeadStatus::New.as_str().to_string(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Contact details are replaced; workflow state stays.
    fn apply(self, current: Model, _slug: Option<String>, now: DateTimeWithTimeZone) -> Model {
        Model {
            name: clean(&self.name),
            email: clean(&self.email).to_ascii_lowercase(),
            phone: clean_opt(self.phone),
            company: clean_opt(self.company),
            message: self.message.trim().to_string(),
            source: clean_opt(self.source),
            updated_at: now,
            ..current
        }
    }
}

/// Admin move of a lead to another status.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LeadStatusUpdate {
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl LeadStatusUpdate {
    /// Validate and apply onto `lead`. Absent notes keep the existing ones;
    /// blank notes clear them.
    pub fn apply_to(self, lead: &mut Model) -> Result<LeadStatus, ValidationErrors> {
        let status: LeadStatus = self.status.parse()?;
        let mut errs = ValidationErrors::new();
        errs.optional_text("notes", self.notes.as_deref(), 2000);
        errs.into_result()?;
        lead.status = status.as_str().to_string();
        if let Some(notes) = self.notes {
            lead.notes = clean_opt(Some(notes));
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Model {
        LeadForm {
            name: " Ada ".into(),
            email: "Ada@Example.com".into(),
            message: "Need a quote".into(),
            ..Default::default()
        }
        .build(Uuid::new_v4(), None, chrono::Utc::now().into())
    }

    #[test]
    fn new_leads_start_as_new() {
        let lead = sample();
        assert_eq!(lead.status, "new");
        assert_eq!(lead.email, "ada@example.com");
        assert_eq!(lead.name, "Ada");
        assert!(lead.slug().is_none());
    }

    #[test]
    fn reports_every_bad_field() {
        let form = LeadForm { email: "nope".into(), phone: Some("call me".into()), ..Default::default() };
        let errs = form.validate(&FormLimits::default());
        let fields: Vec<&str> = errs.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "phone", "message"]);
        assert_eq!(errs.focus(), Some("name"));
    }

    #[test]
    fn status_update_keeps_notes_when_absent() {
        let mut lead = sample();
        LeadStatusUpdate { status: "contacted".into(), notes: Some("called".into()) }
            .apply_to(&mut lead)
            .unwrap();
        let st = LeadStatusUpdate { status: "Qualified".into(), notes: None }.apply_to(&mut lead).unwrap();
        assert_eq!(st, LeadStatus::Qualified);
        assert_eq!(lead.status, "qualified");
        assert_eq!(lead.notes.as_deref(), Some("called"));
    }

    #[test]
    fn unknown_status_is_a_field_error() {
        let mut lead = sample();
        let err = LeadStatusUpdate { status: "won".into(), notes: None }.apply_to(&mut lead).unwrap_err();
        assert_eq!(err.focus(), Some("status"));
        assert_eq!(lead.status, "new");
    }
}
