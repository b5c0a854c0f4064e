//! Listing metadata every content model exposes.
//!
//! The same metadata drives the SQL-backed store and the in-memory store, so
//! search, filter and sort behave identically in both.

use std::fmt;

use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A typed column value as seen by list filters and sorting.
///
/// Variant order defines the cross-type order; `Null` sorts first.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Uuid(Uuid),
    Time(DateTimeWithTimeZone),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self { FieldValue::Bool(v) }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self { FieldValue::Int(v as i64) }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self { FieldValue::Text(v.to_string()) }
}

impl From<&String> for FieldValue {
    fn from(v: &String) -> Self { FieldValue::Text(v.clone()) }
}

impl From<Uuid> for FieldValue {
    fn from(v: Uuid) -> Self { FieldValue::Uuid(v) }
}

impl From<DateTimeWithTimeZone> for FieldValue {
    fn from(v: DateTimeWithTimeZone) -> Self { FieldValue::Time(v) }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(FieldValue::Null) }
}

impl From<FieldValue> for sea_orm::Value {
    fn from(v: FieldValue) -> Self {
        match v {
            FieldValue::Null => sea_orm::Value::String(None),
            FieldValue::Bool(b) => b.into(),
            FieldValue::Int(i) => i.into(),
            FieldValue::Text(s) => s.into(),
            FieldValue::Uuid(u) => u.into(),
            FieldValue::Time(t) => t.into(),
        }
    }
}

/// Value kind of a filterable column; parses raw query-string values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Int,
    Text,
    Uuid,
    /// Text from a closed set of lowercase names, matched case-insensitively.
    Choice(&'static [&'static str]),
}

impl FieldKind {
    pub fn parse(self, raw: &str) -> Option<FieldValue> {
        let raw = raw.trim();
        match self {
            FieldKind::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(FieldValue::Bool(true)),
                "false" | "0" | "no" => Some(FieldValue::Bool(false)),
                _ => None,
            },
            FieldKind::Int => raw.parse::<i64>().ok().map(FieldValue::Int),
            FieldKind::Text => Some(FieldValue::Text(raw.to_string())),
            FieldKind::Uuid => Uuid::parse_str(raw).ok().map(FieldValue::Uuid),
            FieldKind::Choice(names) => names
                .iter()
                .find(|n| n.eq_ignore_ascii_case(raw))
                .map(|n| FieldValue::Text(n.to_string())),
        }
    }

    pub fn describe(self) -> String {
        match self {
            FieldKind::Bool => "a boolean".into(),
            FieldKind::Int => "an integer".into(),
            FieldKind::Text => "text".into(),
            FieldKind::Uuid => "a UUID".into(),
            FieldKind::Choice(names) => format!("one of {}", names.join(", ")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { SortOrder::Asc => "asc", SortOrder::Desc => "desc" })
    }
}

/// A row of one content table.
pub trait Record: Clone + fmt::Debug + Send + Sync + 'static {
    /// Stable name used in logs, metrics and gallery ownership.
    const KIND: &'static str;
    /// Text columns matched by the free-text search box.
    const SEARCH_COLUMNS: &'static [&'static str];
    /// Columns a table header may sort by.
    const SORT_COLUMNS: &'static [&'static str];
    /// Columns accepted as equality filters, with their value kind.
    const FILTER_COLUMNS: &'static [(&'static str, FieldKind)];
    const DEFAULT_SORT: (&'static str, SortOrder);

    fn id(&self) -> Uuid;

    fn slug(&self) -> Option<&str> { None }

    /// Typed value of `column`, `None` for unknown columns.
    fn field(&self, column: &str) -> Option<FieldValue>;

    /// Stamp the modification time.
    fn touch(&mut self, now: DateTimeWithTimeZone);

    fn filter_kind(column: &str) -> Option<FieldKind> {
        Self::FILTER_COLUMNS.iter().find(|(c, _)| *c == column).map(|(_, k)| *k)
    }

    fn is_sortable(column: &str) -> bool {
        Self::SORT_COLUMNS.contains(&column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_filter_values() {
        assert_eq!(FieldKind::Bool.parse("TRUE"), Some(FieldValue::Bool(true)));
        assert_eq!(FieldKind::Bool.parse("0"), Some(FieldValue::Bool(false)));
        assert_eq!(FieldKind::Bool.parse("maybe"), None);
        assert_eq!(FieldKind::Int.parse(" 42 "), Some(FieldValue::Int(42)));
        assert_eq!(FieldKind::Uuid.parse("not-a-uuid"), None);
        let colors = FieldKind::Choice(&["red", "green"]);
        assert_eq!(colors.parse(" Green "), Some(FieldValue::Text("green".into())));
        assert_eq!(colors.parse("blue"), None);
        assert_eq!(colors.describe(), "one of red, green");
        let id = Uuid::new_v4();
        assert_eq!(FieldKind::Uuid.parse(&id.to_string()), Some(FieldValue::Uuid(id)));
    }

    #[test]
    fn null_sorts_before_values() {
        assert!(FieldValue::Null < FieldValue::Text("a".into()));
        assert!(FieldValue::Text("a".into()) < FieldValue::Text("b".into()));
        assert_eq!(FieldValue::from(None::<&str>), FieldValue::Null);
    }

    #[test]
    fn sort_order_parse() {
        assert_eq!(SortOrder::parse("DESC"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse("up"), None);
        assert_eq!(SortOrder::Asc.to_string(), "asc");
    }
}
