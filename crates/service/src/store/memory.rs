//! In-process store with the same listing semantics as the SQL store.

use std::cmp::Ordering;
use std::sync::Mutex;

use async_trait::async_trait;
use common::pagination::Page;
use models::{FieldValue, Record, SortOrder, ValidationErrors};
use uuid::Uuid;

use super::RecordStore;
use crate::errors::ServiceError;
use crate::listing::ListQuery;

/// Rows kept in insertion order.
pub struct MemoryStore<M> {
    rows: Mutex<Vec<M>>,
}

impl<M> Default for MemoryStore<M> {
    fn default() -> Self { Self { rows: Mutex::new(Vec::new()) } }
}

impl<M: Record> MemoryStore<M> {
    pub fn new() -> Self { Self::default() }

    pub fn with_rows(rows: impl IntoIterator<Item = M>) -> Self {
        Self { rows: Mutex::new(rows.into_iter().collect()) }
    }

    pub fn len(&self) -> usize { self.lock().len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<M>> {
        self.rows.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// Order two records by `column`, nulls first and text ignoring case, then
/// by id.
pub(crate) fn compare<M: Record>(a: &M, b: &M, column: &str, order: SortOrder) -> Ordering {
    let primary = sort_key(a, column).cmp(&sort_key(b, column));
    let primary = match order {
        SortOrder::Asc => primary,
        SortOrder::Desc => primary.reverse(),
    };
    primary.then_with(|| a.id().cmp(&b.id()))
}

fn sort_key<M: Record>(record: &M, column: &str) -> FieldValue {
    match record.field(column) {
        Some(FieldValue::Text(s)) => FieldValue::Text(s.to_lowercase()),
        Some(v) => v,
        None => FieldValue::Null,
    }
}

/// Same outcome as the unique slug index of the SQL store.
fn slug_taken<M: Record>(rows: &[M], record: &M) -> bool {
    record
        .slug()
        .is_some_and(|slug| rows.iter().any(|r| r.id() != record.id() && r.slug() == Some(slug)))
}

fn slug_conflict() -> ServiceError {
    ServiceError::Conflict(ValidationErrors::single("slug", "is already in use"))
}

#[async_trait]
impl<M: Record> RecordStore<M> for MemoryStore<M> {
    async fn list(&self, query: &ListQuery) -> Result<Page<M>, ServiceError> {
        let mut hits: Vec<M> = self.lock().iter().filter(|r| query.matches(*r)).cloned().collect();
        let (column, order) = query.effective_sort::<M>();
        hits.sort_by(|a, b| compare(a, b, column, order));
        let total = hits.len() as u64;
        let window = query.window;
        let items = hits
            .into_iter()
            .skip(window.offset() as usize)
            .take(window.per_page as usize)
            .collect();
        Ok(Page::new(items, total, window))
    }

    async fn get(&self, id: Uuid) -> Result<Option<M>, ServiceError> {
        Ok(self.lock().iter().find(|r| r.id() == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<M>, ServiceError> {
        Ok(self.lock().iter().find(|r| r.slug() == Some(slug)).cloned())
    }

    async fn insert(&self, record: M) -> Result<M, ServiceError> {
        let mut rows = self.lock();
        if rows.iter().any(|r| r.id() == record.id()) {
            return Err(ServiceError::Db(format!("duplicate {} id {}", M::KIND, record.id())));
        }
        if slug_taken(&rows, &record) {
            return Err(slug_conflict());
        }
        rows.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: M) -> Result<M, ServiceError> {
        let mut rows = self.lock();
        let idx = rows
            .iter()
            .position(|r| r.id() == record.id())
            .ok_or_else(|| ServiceError::not_found(M::KIND))?;
        if slug_taken(&rows, &record) {
            return Err(slug_conflict());
        }
        rows[idx] = record.clone();
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let mut rows = self.lock();
        let before = rows.len();
        rows.retain(|r| r.id() != id);
        Ok(rows.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use common::pagination::Pagination;
    use models::category::{self, CategoryForm};
    use models::Form;

    fn cat(name: &str, description: Option<&str>, age_days: i64) -> category::Model {
        let now = (Utc::now() - Duration::days(age_days)).into();
        CategoryForm { name: name.into(), slug: None, description: description.map(String::from) }
            .build(Uuid::new_v4(), Some(models::slug::sanitize(name, 96)), now)
    }

    fn store() -> MemoryStore<category::Model> {
        MemoryStore::with_rows([
            cat("Zebra", None, 3),
            cat("alpha", Some("First steps"), 1),
            cat("Mango", Some("fruit NEWS"), 2),
        ])
    }

    #[tokio::test]
    async fn search_is_case_insensitive_over_search_columns() {
        let q = ListQuery { search: Some("news".into()), ..Default::default() };
        let page = store().list(&q).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Mango");
    }

    #[tokio::test]
    async fn sorting_ignores_case_and_falls_back_to_default() {
        // description is not sortable for categories, so the default (name asc) applies
        let q = ListQuery { sort: Some(("description", SortOrder::Asc)), ..Default::default() };
        let names: Vec<String> = store().list(&q).await.unwrap().items.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["alpha", "Mango", "Zebra"]);

        let q = ListQuery { sort: Some(("created_at", SortOrder::Desc)), ..Default::default() };
        let names: Vec<String> = store().list(&q).await.unwrap().items.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["alpha", "Mango", "Zebra"]);
    }

    #[tokio::test]
    async fn pages_slice_after_sorting() {
        let q = ListQuery::default().with_window(Pagination { page: 2, per_page: 2 });
        let page = store().list(&q).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Zebra");
    }

    #[test]
    fn nulls_sort_first_ascending_and_last_descending() {
        use models::blog::BlogForm;
        let now = Utc::now().into();
        let anon = BlogForm { title: "a".into(), content: "c".into(), ..Default::default() }
            .build(Uuid::new_v4(), Some("a".into()), now);
        let signed = BlogForm { title: "b".into(), content: "c".into(), author: Some("Ann".into()), ..Default::default() }
            .build(Uuid::new_v4(), Some("b".into()), now);
        assert_eq!(compare(&anon, &signed, "author", SortOrder::Asc), Ordering::Less);
        assert_eq!(compare(&anon, &signed, "author", SortOrder::Desc), Ordering::Greater);
    }

    #[tokio::test]
    async fn update_missing_row_is_not_found() {
        let s = store();
        let err = s.update(cat("Ghost", None, 0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(s.len(), 3);
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_conflict_on_slug() {
        let s = store();
        let err = s.insert(cat("zebra", None, 0)).await.unwrap_err();
        match err {
            ServiceError::Conflict(errs) => assert_eq!(errs.focus(), Some("slug")),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(s.len(), 3);

        let mut mango = s.find_by_slug("mango").await.unwrap().unwrap();
        mango.slug = "alpha".into();
        assert!(matches!(s.update(mango).await, Err(ServiceError::Conflict(_))));
        assert!(s.find_by_slug("mango").await.unwrap().is_some());
    }
}
