//! List queries: free-text search, equality filters, a whitelisted sort and
//! a page window, parsed from raw query-string pairs.

use std::collections::HashMap;

use common::pagination::Pagination;
use models::{FieldValue, Record, SortOrder, ValidationErrors};

use crate::errors::ServiceError;

/// Page-size bounds applied while parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListLimits {
    pub default_per_page: u32,
    pub max_per_page: u32,
}

impl Default for ListLimits {
    fn default() -> Self { Self { default_per_page: 20, max_per_page: common::pagination::MAX_PER_PAGE } }
}

impl From<&configs::ContentConfig> for ListLimits {
    fn from(c: &configs::ContentConfig) -> Self {
        Self { default_per_page: c.default_per_page, max_per_page: c.max_per_page }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListQuery {
    pub search: Option<String>,
    /// Equality filters, all of which must hold.
    pub filters: Vec<(&'static str, FieldValue)>,
    /// `None` means the record's default sort.
    pub sort: Option<(&'static str, SortOrder)>,
    pub window: Pagination,
}

impl ListQuery {
    /// Parse query-string pairs for record type `M`.
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use service::listing::{ListLimits, ListQuery};
    /// let pairs: HashMap<String, String> =
    ///     [("q", "rust"), ("sort", "-title"), ("published", "true"), ("per_page", "500")]
    ///         .into_iter()
    ///         .map(|(k, v)| (k.to_string(), v.to_string()))
    ///         .collect();
    /// let q = ListQuery::parse::<models::blog::Model>(&pairs, ListLimits::default()).unwrap();
    /// assert_eq!(q.search.as_deref(), Some("rust"));
    /// assert_eq!(q.window.per_page, 100);
    /// assert_eq!(q.filters.len(), 1);
    /// ```
    pub fn parse<M: Record>(pairs: &HashMap<String, String>, limits: ListLimits) -> Result<Self, ServiceError> {
        let mut errs = ValidationErrors::new();

        let search = pairs.get("q").map(|s| s.trim()).filter(|s| !s.is_empty()).map(str::to_string);

        let mut sort = None;
        if let Some(raw) = pairs.get("sort").map(|s| s.trim()).filter(|s| !s.is_empty()) {
            let (col, order) = match raw.strip_prefix('-') {
                Some(col) => (col, SortOrder::Desc),
                None => (raw, SortOrder::Asc),
            };
            sort = M::SORT_COLUMNS.iter().find(|c| **c == col).map(|c| (*c, order));
        }
        if let Some(order) = pairs.get("order").and_then(|o| SortOrder::parse(o)) {
            let col = sort.map(|(c, _)| c).unwrap_or(M::DEFAULT_SORT.0);
            sort = Some((col, order));
        }

        let page = parse_number(pairs, "page", &mut errs).unwrap_or(1);
        let per_page = parse_number(pairs, "per_page", &mut errs).unwrap_or(limits.default_per_page);
        let window = Pagination { page, per_page }.clamped(limits.max_per_page);

        let mut filters = Vec::new();
        for (col, kind) in M::FILTER_COLUMNS {
            let Some(raw) = pairs.get(*col).map(|s| s.trim()).filter(|s| !s.is_empty()) else { continue };
            match kind.parse(raw) {
                Some(v) => filters.push((*col, v)),
                None => errs.push(col, format!("must be {}", kind.describe())),
            }
        }

        if !errs.is_empty() {
            return Err(ServiceError::BadQuery(errs));
        }
        Ok(Self { search, filters, sort, window })
    }

    pub fn with_filter(mut self, column: &'static str, value: impl Into<FieldValue>) -> Self {
        self.filters.retain(|(c, _)| *c != column);
        self.filters.push((column, value.into()));
        self
    }

    pub fn with_window(mut self, window: Pagination) -> Self {
        self.window = window;
        self
    }

    /// Sort in effect for `M`: the requested one when sortable, else the default.
    pub fn effective_sort<M: Record>(&self) -> (&'static str, SortOrder) {
        match self.sort {
            Some((col, order)) if M::is_sortable(col) => (col, order),
            _ => M::DEFAULT_SORT,
        }
    }

    /// Whether `record` satisfies the search term and every filter.
    pub fn matches<M: Record>(&self, record: &M) -> bool {
        let filters_ok = self
            .filters
            .iter()
            .all(|(col, want)| record.field(col).as_ref() == Some(want));
        if !filters_ok {
            return false;
        }
        match &self.search {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                M::SEARCH_COLUMNS.iter().any(|col| {
                    record
                        .field(col)
                        .and_then(|v| v.as_text().map(|s| s.to_lowercase().contains(&term)))
                        .unwrap_or(false)
                })
            }
        }
    }
}

fn parse_number(pairs: &HashMap<String, String>, key: &str, errs: &mut ValidationErrors) -> Option<u32> {
    let raw = pairs.get(key).map(|s| s.trim()).filter(|s| !s.is_empty())?;
    match raw.parse::<u32>() {
        Ok(n) => Some(n),
        Err(_) => {
            errs.push(key, "must be a non-negative integer");
            None
        }
    }
}
