//! The generic list/edit controller, instantiated once per content type.
//!
//! Every write runs the same pipeline: field validation, parent existence,
//! slug derivation and duplicate check, persistence, gallery sync.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::pagination::Page;
use common::types::SlugStatus;
use models::gallery_image::{Owner, OwnerKind};
use models::{slug, Form, FormLimits, Record, ValidationErrors};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::gallery::{self, GalleryStore};
use crate::listing::{ListLimits, ListQuery};
use crate::metrics;
use crate::store::RecordStore;

/// A record as returned to editors: the row plus its gallery, when it has one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry<M> {
    #[serde(flatten)]
    pub record: M,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery: Option<Vec<String>>,
}

/// Existence check for rows referenced by a form (category, service).
#[async_trait]
pub trait ParentLookup: Send + Sync {
    async fn exists(&self, id: Uuid) -> Result<bool, ServiceError>;
}

pub struct ContentService<M: Record> {
    store: Arc<dyn RecordStore<M>>,
    parent: Option<Arc<dyn ParentLookup>>,
    gallery: Option<(Arc<dyn GalleryStore>, OwnerKind)>,
    form_limits: FormLimits,
    list_limits: ListLimits,
}

impl<M: Record> ContentService<M> {
    pub fn new(store: Arc<dyn RecordStore<M>>) -> Self {
        Self {
            store,
            parent: None,
            gallery: None,
            form_limits: FormLimits::default(),
            list_limits: ListLimits::default(),
        }
    }

    /// Rows referenced by the form's parent field must exist in `parent`.
    pub fn with_parent(mut self, parent: Arc<dyn ParentLookup>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_gallery(mut self, store: Arc<dyn GalleryStore>, kind: OwnerKind) -> Self {
        self.gallery = Some((store, kind));
        self
    }

    pub fn configured(mut self, cfg: &configs::ContentConfig) -> Self {
        self.form_limits = FormLimits { slug_max_len: cfg.slug_max_len, gallery_max_images: cfg.gallery_max_images };
        self.list_limits = ListLimits::from(cfg);
        self
    }

    pub fn kind(&self) -> &'static str { M::KIND }

    pub fn parse_query(&self, pairs: &HashMap<String, String>) -> Result<ListQuery, ServiceError> {
        ListQuery::parse::<M>(pairs, self.list_limits)
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<M>, ServiceError> {
        self.store.list(query).await
    }

    /// Raw row without gallery.
    pub async fn find(&self, id: Uuid) -> Result<Option<M>, ServiceError> {
        self.store.get(id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Entry<M>, ServiceError> {
        let record = self.store.get(id).await?.ok_or_else(|| ServiceError::not_found(M::KIND))?;
        self.entry(record).await
    }

    pub async fn get_by_slug(&self, raw: &str) -> Result<Entry<M>, ServiceError> {
        let wanted = slug::sanitize(raw, self.form_limits.slug_max_len);
        if wanted.is_empty() {
            return Err(ServiceError::not_found(M::KIND));
        }
        let record = self.store.find_by_slug(&wanted).await?.ok_or_else(|| ServiceError::not_found(M::KIND))?;
        self.entry(record).await
    }

    /// Attach the gallery of `record`, when this type has one.
    pub async fn entry(&self, record: M) -> Result<Entry<M>, ServiceError> {
        let gallery = match &self.gallery {
            Some((store, kind)) => Some(gallery::urls(store.as_ref(), Owner { kind: *kind, id: record.id() }).await?),
            None => None,
        };
        Ok(Entry { record, gallery })
    }

    #[instrument(skip(self, form), fields(kind = M::KIND))]
    pub async fn create<F: Form<Model = M>>(&self, form: F) -> Result<Entry<M>, ServiceError> {
        let slug = self.check(&form, None).await?;
        let desired = form.gallery().map(<[String]>::to_vec);
        let record = form.build(Uuid::new_v4(), slug, Utc::now().into());
        let saved = self.store.insert(record).await?;
        let gallery = match self.sync_gallery(saved.id(), desired).await {
            Ok(gallery) => gallery,
            Err(e) => {
                // no half-saved record: the row goes with its gallery
                if let Err(undo) = self.store.delete(saved.id()).await {
                    warn!(id = %saved.id(), error = %undo, "create_rollback_failed");
                }
                return Err(e);
            }
        };
        metrics::record_mutation(M::KIND, "create");
        info!(id = %saved.id(), slug = saved.slug().unwrap_or_default(), "content_created");
        Ok(Entry { record: saved, gallery })
    }

    #[instrument(skip(self, form), fields(kind = M::KIND))]
    pub async fn update<F: Form<Model = M>>(&self, id: Uuid, form: F) -> Result<Entry<M>, ServiceError> {
        let current = self.store.get(id).await?.ok_or_else(|| ServiceError::not_found(M::KIND))?;
        let slug = self.check(&form, Some(&current)).await?;
        let desired = form.gallery().map(<[String]>::to_vec);
        let previous = current.clone();
        let record = form.apply(current, slug, Utc::now().into());
        let saved = self.store.update(record).await?;
        let gallery = match desired {
            Some(_) => match self.sync_gallery(saved.id(), desired).await {
                Ok(gallery) => gallery,
                Err(e) => {
                    // the gallery store applies atomically, so only the row needs restoring
                    if let Err(undo) = self.store.update(previous).await {
                        warn!(id = %saved.id(), error = %undo, "update_rollback_failed");
                    }
                    return Err(e);
                }
            },
            None => self.entry(saved.clone()).await?.gallery,
        };
        metrics::record_mutation(M::KIND, "update");
        info!(slug = saved.slug().unwrap_or_default(), "content_updated");
        Ok(Entry { record: saved, gallery })
    }

    /// Delete the row and its gallery. `false` when nothing matched.
    #[instrument(skip(self), fields(kind = M::KIND))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            if let Some((store, kind)) = &self.gallery {
                let removed = store.clear(Owner { kind: *kind, id }).await?;
                tracing::debug!(removed, "gallery_cleared");
            }
            metrics::record_mutation(M::KIND, "delete");
            info!("content_deleted");
        }
        Ok(deleted)
    }

    /// Sanitized form of `raw` and whether a save could use it. A slug held
    /// by `exclude` counts as available.
    pub async fn slug_status(&self, raw: &str, exclude: Option<Uuid>) -> Result<SlugStatus, ServiceError> {
        let slug = slug::sanitize(raw, self.form_limits.slug_max_len);
        if slug.is_empty() {
            return Ok(SlugStatus { slug, available: false });
        }
        let holder = self.store.find_by_slug(&slug).await?;
        let available = match holder {
            None => true,
            Some(r) => Some(r.id()) == exclude,
        };
        Ok(SlugStatus { slug, available })
    }

    /// Load, change and persist one row outside the form pipeline.
    #[instrument(skip(self, f), fields(kind = M::KIND))]
    pub async fn modify<T, F>(&self, id: Uuid, f: F) -> Result<(M, T), ServiceError>
    where
        F: FnOnce(&mut M) -> Result<T, ValidationErrors> + Send,
        T: Send,
    {
        let mut record = self.store.get(id).await?.ok_or_else(|| ServiceError::not_found(M::KIND))?;
        let out = match f(&mut record) {
            Ok(out) => out,
            Err(errs) => {
                metrics::record_rejection(M::KIND);
                return Err(ServiceError::Invalid(errs));
            }
        };
        record.touch(Utc::now().into());
        let saved = self.store.update(record).await?;
        metrics::record_mutation(M::KIND, "modify");
        Ok((saved, out))
    }

    /// Validate `form` against this store; returns the slug to persist.
    async fn check<F: Form<Model = M>>(&self, form: &F, current: Option<&M>) -> Result<Option<String>, ServiceError> {
        let mut errs = form.validate(&self.form_limits);

        if let (Some(parent), Some(lookup)) = (form.parent(), &self.parent) {
            if errs.message_for(parent.field).is_none() && !lookup.exists(parent.id).await? {
                errs.push(parent.field, "does not exist");
            }
        }

        let mut slug = None;
        if let Some(source) = form.slug_source() {
            let requested = form.requested_slug();
            slug = slug::resolve(requested, source, current.and_then(|c| c.slug()), self.form_limits.slug_max_len);
            let asked = requested.map(|s| !s.trim().is_empty()).unwrap_or(false);
            if slug.is_none() && (asked || !source.trim().is_empty()) {
                errs.push("slug", "must contain at least one letter or digit");
            }
        }

        if !errs.is_empty() {
            metrics::record_rejection(M::KIND);
            warn!(kind = M::KIND, fields = %errs, "validation_failed");
            return Err(ServiceError::Invalid(errs.ordered_by(F::FIELDS)));
        }

        if let Some(s) = &slug {
            if let Some(holder) = self.store.find_by_slug(s).await? {
                if Some(holder.id()) != current.map(Record::id) {
                    metrics::record_rejection(M::KIND);
                    warn!(kind = M::KIND, slug = %s, "slug_conflict");
                    return Err(ServiceError::Conflict(ValidationErrors::single("slug", "is already in use")));
                }
            }
        }
        Ok(slug)
    }

    async fn sync_gallery(&self, id: Uuid, desired: Option<Vec<String>>) -> Result<Option<Vec<String>>, ServiceError> {
        match (&self.gallery, desired) {
            (Some((store, kind)), Some(urls)) => {
                Ok(Some(gallery::sync(store.as_ref(), Owner { kind: *kind, id }, &urls).await?))
            }
            (Some(_), None) => Ok(Some(Vec::new())),
            (None, _) => Ok(None),
        }
    }
}

#[async_trait]
impl<M: Record> ParentLookup for ContentService<M> {
    async fn exists(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.store.get(id).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::MemoryGallery;
    use crate::store::MemoryStore;
    use models::category::{self, CategoryForm};
    use models::project::{self, ProjectForm};

    fn categories() -> Arc<ContentService<category::Model>> {
        Arc::new(ContentService::<category::Model>::new(Arc::new(MemoryStore::<category::Model>::new())))
    }

    fn projects(cats: Arc<ContentService<category::Model>>) -> ContentService<project::Model> {
        ContentService::<project::Model>::new(Arc::new(MemoryStore::<project::Model>::new()))
            .with_parent(cats)
            .with_gallery(Arc::new(MemoryGallery::new()), OwnerKind::Project)
    }

    fn project_form(title: &str) -> ProjectForm {
        ProjectForm { title: title.into(), description: "work".into(), ..Default::default() }
    }

    #[tokio::test]
    async fn create_derives_slug_from_title() {
        let svc = categories();
        let e = svc.create(CategoryForm { name: "Web Design & UX".into(), ..Default::default() }).await.unwrap();
        assert_eq!(e.record.slug, "web-design-ux");
        assert!(e.gallery.is_none());
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_conflict_on_slug() {
        let svc = categories();
        svc.create(CategoryForm { name: "News".into(), ..Default::default() }).await.unwrap();
        let err = svc
            .create(CategoryForm { name: "Other".into(), slug: Some(" NEWS ".into()), ..Default::default() })
            .await
            .unwrap_err();
        match err {
            ServiceError::Conflict(errs) => assert_eq!(errs.focus(), Some("slug")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_form_reports_fields_in_form_order() {
        let cats = categories();
        let svc = projects(cats);
        let form = ProjectForm {
            slug: Some("%%%".into()),
            category_id: Some(Uuid::new_v4()),
            gallery: vec!["not a url".into()],
            ..Default::default()
        };
        let ServiceError::Invalid(errs) = svc.create(form).await.unwrap_err() else { panic!("expected invalid") };
        let fields: Vec<&str> = errs.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "slug", "description", "category_id", "gallery"]);
        assert_eq!(errs.focus(), Some("title"));
    }

    #[tokio::test]
    async fn update_keeps_slug_and_syncs_gallery() {
        let cats = categories();
        let cat = cats.create(CategoryForm { name: "Cases".into(), ..Default::default() }).await.unwrap();
        let svc = projects(cats);

        let mut form = project_form("Harbor Refit");
        form.category_id = Some(cat.record.id);
        form.gallery = vec!["/a.jpg".into(), "/b.jpg".into()];
        let created = svc.create(form.clone()).await.unwrap();
        assert_eq!(created.gallery.as_deref(), Some(&["/a.jpg".to_string(), "/b.jpg".to_string()][..]));

        form.title = "Harbor Refit, Phase 2".into();
        form.gallery = vec!["/b.jpg".into(), "/c.jpg".into(), "/b.jpg".into()];
        let updated = svc.update(created.record.id, form).await.unwrap();
        assert_eq!(updated.record.slug, "harbor-refit");
        assert_eq!(updated.record.created_at, created.record.created_at);
        assert_eq!(updated.gallery, Some(vec!["/b.jpg".to_string(), "/c.jpg".to_string()]));
        assert_eq!(svc.get(created.record.id).await.unwrap().gallery, updated.gallery);
    }

    #[tokio::test]
    async fn own_slug_does_not_conflict_on_update() {
        let svc = categories();
        let e = svc.create(CategoryForm { name: "Tools".into(), ..Default::default() }).await.unwrap();
        let same = CategoryForm { name: "Tools!".into(), slug: Some("tools".into()), ..Default::default() };
        assert!(svc.update(e.record.id, same).await.is_ok());

        assert!(!svc.slug_status("Tools", None).await.unwrap().available);
        assert!(svc.slug_status("Tools", Some(e.record.id)).await.unwrap().available);
        let fresh = svc.slug_status("Brand New!", None).await.unwrap();
        assert_eq!(fresh, SlugStatus { slug: "brand-new".into(), available: true });
        assert!(!svc.slug_status("???", None).await.unwrap().available);
    }

    #[tokio::test]
    async fn update_and_delete_missing_rows() {
        let svc = categories();
        let err = svc.update(Uuid::new_v4(), CategoryForm { name: "X".into(), ..Default::default() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert!(!svc.delete(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn delete_clears_gallery() {
        let gallery = Arc::new(MemoryGallery::new());
        let svc = ContentService::<project::Model>::new(Arc::new(MemoryStore::<project::Model>::new()))
            .with_gallery(gallery.clone(), OwnerKind::Project);
        let mut form = project_form("Gone");
        form.gallery = vec!["/x.jpg".into()];
        let e = svc.create(form).await.unwrap();
        assert!(svc.delete(e.record.id).await.unwrap());
        let owner = Owner { kind: OwnerKind::Project, id: e.record.id };
        assert!(gallery.list(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_by_slug_sanitizes_lookup() {
        let svc = categories();
        svc.create(CategoryForm { name: "Field Notes".into(), ..Default::default() }).await.unwrap();
        assert_eq!(svc.get_by_slug("Field Notes").await.unwrap().record.name, "Field Notes");
        assert!(matches!(svc.get_by_slug("nope").await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn entry_serializes_flat_with_optional_gallery() {
        let svc = categories();
        let e = svc.create(CategoryForm { name: "Flat".into(), ..Default::default() }).await.unwrap();
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["slug"], "flat");
        assert!(v.get("gallery").is_none());

        let p = projects(categories()).create(project_form("Pier")).await.unwrap();
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["title"], "Pier");
        assert_eq!(v["gallery"], serde_json::json!([]));
    }

    /// Gallery backend that lists fine but cannot write.
    struct BrokenGallery;

    #[async_trait]
    impl GalleryStore for BrokenGallery {
        async fn list(&self, _owner: Owner) -> Result<Vec<models::gallery_image::Model>, ServiceError> {
            Ok(Vec::new())
        }
        async fn apply(&self, _owner: Owner, _plan: &crate::gallery::SyncPlan) -> Result<(), ServiceError> {
            Err(ServiceError::Db("down".into()))
        }
        async fn clear(&self, _owner: Owner) -> Result<u64, ServiceError> {
            Ok(0)
        }
    }

    fn projects_with_broken_gallery() -> (Arc<MemoryStore<project::Model>>, ContentService<project::Model>) {
        let store = Arc::new(MemoryStore::<project::Model>::new());
        let svc = ContentService::<project::Model>::new(store.clone())
            .with_gallery(Arc::new(BrokenGallery), OwnerKind::Project);
        (store, svc)
    }

    #[tokio::test]
    async fn failed_gallery_sync_leaves_no_row_behind() {
        let (store, svc) = projects_with_broken_gallery();
        let mut form = project_form("Lighthouse");
        form.gallery = vec!["/l.jpg".into()];

        let first = svc.create(form.clone()).await.unwrap_err();
        assert!(matches!(first, ServiceError::Db(_)));
        assert!(store.is_empty());

        // a retry meets the same outage, not a slug conflict with a ghost row
        let retry = svc.create(form).await.unwrap_err();
        assert!(matches!(retry, ServiceError::Db(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn failed_gallery_sync_restores_the_previous_row() {
        let (_store, svc) = projects_with_broken_gallery();
        let saved = svc.create(project_form("Lighthouse")).await.unwrap();

        let mut form = project_form("Lighthouse Renamed");
        form.gallery = vec!["/l.jpg".into()];
        let err = svc.update(saved.record.id, form).await.unwrap_err();
        assert!(matches!(err, ServiceError::Db(_)));

        let current = svc.get(saved.record.id).await.unwrap();
        assert_eq!(current.record.title, "Lighthouse");
        assert_eq!(current.record.updated_at, saved.record.updated_at);
    }
}
