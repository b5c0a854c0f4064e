//! Pagination utilities shared by the service and HTTP layers
//!
//! `Pagination` is the requested window, `Page` the returned slice.

use serde::{Deserialize, Serialize};

/// Upper bound applied by [`Pagination::normalize`].
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane defaults and convert to `(page_index, per_page)` as `u64`
    pub fn normalize(self) -> (u64, u64) {
        self.normalize_with(MAX_PER_PAGE)
    }

    /// Same as [`normalize`](Self::normalize) with a caller-provided ceiling.
    pub fn normalize_with(self, max_per_page: u32) -> (u64, u64) {
        let clamped = self.clamped(max_per_page);
        ((clamped.page - 1) as u64, clamped.per_page as u64)
    }

    /// Page forced to >= 1 and per_page into `1..=max_per_page`.
    pub fn clamped(self, max_per_page: u32) -> Self {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, max_per_page.max(1));
        Self { page, per_page }
    }

    /// Offset of the first row of this page.
    pub fn offset(self) -> u64 {
        let (idx, per) = self.normalize_with(u32::MAX);
        idx * per
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}

/// One page of a listing plus the totals a table footer needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, window: Pagination) -> Self {
        let per = window.per_page.max(1) as u64;
        Self {
            items,
            total,
            page: window.page.max(1),
            per_page: window.per_page.max(1),
            total_pages: total.div_ceil(per),
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (idx, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!(idx, 0);
        assert_eq!(per, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (idx, per) = Pagination { page: 5, per_page: 1000 }.normalize();
        assert_eq!(idx, 4);
        assert_eq!(per, 100);
    }

    #[test]
    fn normalize_with_custom_ceiling() {
        let (_, per) = Pagination { page: 1, per_page: 80 }.normalize_with(50);
        assert_eq!(per, 50);
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.per_page, 20);
    }

    #[test]
    fn offset_follows_page() {
        assert_eq!(Pagination { page: 3, per_page: 10 }.offset(), 20);
    }

    #[test]
    fn page_counts_partial_last_page() {
        let p = Page::new(vec![1, 2, 3], 21, Pagination { page: 3, per_page: 10 });
        assert_eq!(p.total_pages, 3);
        let empty: Page<u8> = Page::new(vec![], 0, Pagination::default());
        assert_eq!(empty.total_pages, 0);
        let mapped = p.map(|x| x * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
    }
}
