//! Field-level validation shared by every content form.
//!
//! Checks never stop at the first failure: a form reports all failing fields
//! so the editor can mark each input, and the first entry is the field the
//! client moves focus to.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9+\-(). ]+$").expect("phone regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self { Self::default() }

    /// Shorthand for a single failing field.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errs = Self::new();
        errs.push(field, message);
        errs
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError { field: field.to_string(), message: message.into() });
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> { self.0.iter() }

    /// The field a form should scroll to and focus.
    pub fn focus(&self) -> Option<&str> { self.0.first().map(|e| e.field.as_str()) }

    /// First message reported for `field`.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message.as_str())
    }

    /// Reorder errors to follow the on-screen field order. Fields not listed
    /// keep their relative order after the listed ones.
    pub fn ordered_by(mut self, fields: &[&str]) -> Self {
        self.0.sort_by_key(|e| fields.iter().position(|f| *f == e.field).unwrap_or(fields.len()));
        self
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Required text, trimmed length within `1..=max` characters.
    pub fn require_text(&mut self, field: &str, value: &str, max: usize) {
        let len = value.trim().chars().count();
        if len == 0 {
            self.push(field, "is required");
        } else if len > max {
            self.push(field, format!("must be at most {max} characters"));
        }
    }

    /// Optional text; blank counts as absent.
    pub fn optional_text(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(v) = value {
            if v.trim().chars().count() > max {
                self.push(field, format!("must be at most {max} characters"));
            }
        }
    }

    /// Optional image reference: absolute http(s) URL or root-relative path.
    pub fn optional_image_url(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            if !is_image_url(v) {
                self.push(field, "must be an http(s) URL or a path starting with '/'");
            }
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        let v = value.trim();
        if v.is_empty() {
            self.push(field, "is required");
        } else if v.chars().count() > 254 || !EMAIL_RE.is_match(v) {
            self.push(field, "must be a valid email address");
        }
    }

    pub fn optional_phone(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            if v.chars().count() > 32 || !PHONE_RE.is_match(v) {
                self.push(field, "must be a valid phone number");
            }
        }
    }

    pub fn non_negative(&mut self, field: &str, value: i32) {
        if value < 0 {
            self.push(field, "must be zero or greater");
        }
    }

    /// Gallery list: bounded count, every entry a valid image reference.
    pub fn gallery(&mut self, field: &str, urls: &[String], max_images: usize) {
        if urls.len() > max_images {
            self.push(field, format!("must contain at most {max_images} images"));
        }
        if let Some(idx) = urls.iter().position(|u| !is_image_url(u.trim())) {
            self.push(field, format!("image #{} must be an http(s) URL or a path starting with '/'", idx + 1));
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| format!("{}: {}", e.field, e.message)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn is_image_url(v: &str) -> bool {
    let rest = v
        .strip_prefix("https://")
        .or_else(|| v.strip_prefix("http://"));
    match rest {
        Some(host) => !host.is_empty() && !host.starts_with('/') && !v.contains(char::is_whitespace),
        None => v.starts_with('/') && !v.starts_with("//") && !v.contains(char::is_whitespace),
    }
}

/// Trimmed copy of a required field.
pub fn clean(v: &str) -> String { v.trim().to_string() }

/// Trimmed copy of an optional field; blank becomes `None`.
pub fn clean_opt(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_all_failures_in_push_order() {
        let mut errs = ValidationErrors::new();
        errs.require_text("title", "   ", 10);
        errs.require_text("summary", "x".repeat(11).as_str(), 10);
        errs.email("email", "nope");
        assert_eq!(errs.len(), 3);
        assert_eq!(errs.focus(), Some("title"));
        assert_eq!(errs.message_for("summary"), Some("must be at most 10 characters"));
        assert_eq!(errs.to_string(), "title: is required; summary: must be at most 10 characters; email: must be a valid email address");
    }

    #[test]
    fn ordered_by_follows_form_layout() {
        let mut errs = ValidationErrors::new();
        errs.push("slug", "taken");
        errs.push("extra", "x");
        errs.push("title", "is required");
        let errs = errs.ordered_by(&["title", "slug"]);
        let fields: Vec<&str> = errs.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "slug", "extra"]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let mut errs = ValidationErrors::new();
        errs.require_text("name", "ééééé", 5);
        assert!(errs.is_empty());
    }

    #[test]
    fn image_urls() {
        assert!(is_image_url("https://cdn.example.com/a.png"));
        assert!(is_image_url("http://cdn.example.com/a.png"));
        assert!(is_image_url("/uploads/a.png"));
        assert!(!is_image_url("//cdn.example.com/a.png"));
        assert!(!is_image_url("ftp://cdn.example.com/a.png"));
        assert!(!is_image_url("https://"));
        assert!(!is_image_url("uploads/a.png"));
        assert!(!is_image_url("/uploads/a b.png"));
    }

    #[test]
    fn blank_optional_values_are_ignored() {
        let mut errs = ValidationErrors::new();
        errs.optional_image_url("cover_image", Some("  "));
        errs.optional_phone("phone", Some(""));
        errs.optional_text("excerpt", None, 3);
        assert!(errs.is_empty());
    }

    #[test]
    fn phone_and_gallery_rules() {
        let mut errs = ValidationErrors::new();
        errs.optional_phone("phone", Some("+1 (555) 010-9999"));
        assert!(errs.is_empty());
        errs.optional_phone("phone", Some("call me"));
        errs.gallery("gallery", &["/a.png".into(), "bad".into()], 1);
        assert_eq!(errs.len(), 3);
        assert_eq!(errs.iter().nth(2).unwrap().message, "image #2 must be an http(s) URL or a path starting with '/'");
    }

    #[test]
    fn clean_helpers_trim() {
        assert_eq!(clean("  a "), "a");
        assert_eq!(clean_opt(Some("  ".into())), None);
        assert_eq!(clean_opt(Some(" b ".into())), Some("b".into()));
    }
}
