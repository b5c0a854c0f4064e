//! URL slug rules.
//!
//! Slugs are lowercase ASCII letters and digits separated by single hyphens.
//! Anything else, including non-ASCII letters, acts as a separator.

/// Default maximum slug length in characters.
pub const DEFAULT_MAX_LEN: usize = 96;

/// Normalize arbitrary input into a slug, at most `max_len` characters long.
///
/// ```
/// assert_eq!(models::slug::sanitize("  Hello, World!  ", 96), "hello-world");
/// assert_eq!(models::slug::sanitize("--Rust__2024--", 96), "rust-2024");
/// ```
pub fn sanitize(input: &str, max_len: usize) -> String {
    let mut out = String::with_capacity(input.len().min(max_len));
    let mut pending_sep = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                if out.len() + 1 >= max_len {
                    break;
                }
                out.push('-');
            }
            pending_sep = false;
            if out.len() >= max_len {
                break;
            }
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Slug to persist for a save.
///
/// A non-blank `requested` slug wins; otherwise a new record derives one from
/// `source` and an existing record keeps `current`. Returns `None` when the
/// result would be empty.
pub fn resolve(requested: Option<&str>, source: &str, current: Option<&str>, max_len: usize) -> Option<String> {
    let slug = match requested.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => sanitize(raw, max_len),
        None => match current {
            Some(existing) => existing.to_string(),
            None => sanitize(source, max_len),
        },
    };
    if slug.is_empty() { None } else { Some(slug) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_and_trims_separators() {
        assert_eq!(sanitize("  Our   New -- Office ", 96), "our-new-office");
        assert_eq!(sanitize("a/b\\c.d", 96), "a-b-c-d");
        assert_eq!(sanitize("!!!", 96), "");
    }

    #[test]
    fn non_ascii_letters_separate_words() {
        assert_eq!(sanitize("Café Déjà vu", 96), "caf-d-j-vu");
        assert_eq!(sanitize("日本 2024", 96), "2024");
    }

    #[test]
    fn truncation_never_leaves_trailing_hyphen() {
        assert_eq!(sanitize("abcd efgh", 5), "abcd");
        assert_eq!(sanitize("abcd efgh", 6), "abcd-e");
        assert_eq!(sanitize("abcdefgh", 3), "abc");
        assert!(sanitize(&"word ".repeat(50), 96).len() <= 96);
        assert!(!sanitize(&"word ".repeat(50), 96).ends_with('-'));
    }

    #[test]
    fn resolve_prefers_requested_then_current_then_source() {
        assert_eq!(resolve(Some(" My Slug "), "Title", None, 96).as_deref(), Some("my-slug"));
        assert_eq!(resolve(Some("  "), "Fresh Title", None, 96).as_deref(), Some("fresh-title"));
        assert_eq!(resolve(None, "Changed Title", Some("kept-slug"), 96).as_deref(), Some("kept-slug"));
        assert_eq!(resolve(Some("???"), "Title", None, 96), None);
        assert_eq!(resolve(None, "", None, 96), None);
    }
}
