use std::sync::Arc;

use configs::AppConfig;
use models::gallery_image::OwnerKind;
use models::{blog, category, lead, project, service as svc, subservice};
use sea_orm::DatabaseConnection;
use service::gallery::{GalleryStore, MemoryGallery, SeaOrmGallery};
use service::leads::LeadService;
use service::store::{MemoryStore, RecordStore, SeaOrmStore};
use service::ContentService;

/// Backing stores for every content type.
pub struct Stores {
    pub categories: Arc<dyn RecordStore<category::Model>>,
    pub blogs: Arc<dyn RecordStore<blog::Model>>,
    pub projects: Arc<dyn RecordStore<project::Model>>,
    pub services: Arc<dyn RecordStore<svc::Model>>,
    pub subservices: Arc<dyn RecordStore<subservice::Model>>,
    pub leads: Arc<dyn RecordStore<lead::Model>>,
    pub gallery: Arc<dyn GalleryStore>,
}

impl Stores {
    pub fn seaorm(db: DatabaseConnection) -> Self {
        Self {
            categories: Arc::new(SeaOrmStore::<category::Entity>::new(db.clone())),
            blogs: Arc::new(SeaOrmStore::<blog::Entity>::new(db.clone())),
            projects: Arc::new(SeaOrmStore::<project::Entity>::new(db.clone())),
            services: Arc::new(SeaOrmStore::<svc::Entity>::new(db.clone())),
            subservices: Arc::new(SeaOrmStore::<subservice::Entity>::new(db.clone())),
            leads: Arc::new(SeaOrmStore::<lead::Entity>::new(db.clone())),
            gallery: Arc::new(SeaOrmGallery::new(db)),
        }
    }

    /// Process-local stores; nothing survives a restart.
    pub fn memory() -> Self {
        Self {
            categories: Arc::new(MemoryStore::<category::Model>::new()),
            blogs: Arc::new(MemoryStore::<blog::Model>::new()),
            projects: Arc::new(MemoryStore::<project::Model>::new()),
            services: Arc::new(MemoryStore::<svc::Model>::new()),
            subservices: Arc::new(MemoryStore::<subservice::Model>::new()),
            leads: Arc::new(MemoryStore::<lead::Model>::new()),
            gallery: Arc::new(MemoryGallery::new()),
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub categories: Arc<ContentService<category::Model>>,
    pub blogs: Arc<ContentService<blog::Model>>,
    pub projects: Arc<ContentService<project::Model>>,
    pub services: Arc<ContentService<svc::Model>>,
    pub subservices: Arc<ContentService<subservice::Model>>,
    pub leads: Arc<LeadService>,
    /// Accepted admin keys; empty leaves `/admin` open.
    pub admin_keys: Arc<Vec<String>>,
}

impl ServerState {
    pub fn new(stores: Stores, cfg: &AppConfig) -> Self {
        let content = &cfg.content;
        let categories = Arc::new(ContentService::new(stores.categories).configured(content));
        let services = Arc::new(
            ContentService::new(stores.services)
                .configured(content)
                .with_gallery(stores.gallery.clone(), OwnerKind::Service),
        );
        let blogs = ContentService::new(stores.blogs).configured(content).with_parent(categories.clone());
        let projects = ContentService::new(stores.projects)
            .configured(content)
            .with_parent(categories.clone())
            .with_gallery(stores.gallery, OwnerKind::Project);
        let subservices = ContentService::new(stores.subservices).configured(content).with_parent(services.clone());

        Self {
            categories,
            blogs: Arc::new(blogs),
            projects: Arc::new(projects),
            services,
            subservices: Arc::new(subservices),
            leads: Arc::new(LeadService::new(stores.leads).configured(content)),
            admin_keys: Arc::new(cfg.admin.api_keys.clone()),
        }
    }

    pub fn admin_open(&self) -> bool { self.admin_keys.is_empty() }
}
