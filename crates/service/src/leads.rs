//! Lead intake from the public contact form and the admin follow-up workflow.

use std::collections::HashMap;
use std::sync::Arc;

use common::pagination::Page;
use models::lead::{self, LeadForm, LeadStatus, LeadStatusUpdate};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::content::ContentService;
use crate::errors::ServiceError;
use crate::listing::ListQuery;
use crate::metrics::LEADS_SUBMITTED_TOTAL;
use crate::store::RecordStore;

pub struct LeadService {
    content: ContentService<lead::Model>,
}

impl LeadService {
    pub fn new(store: Arc<dyn RecordStore<lead::Model>>) -> Self {
        Self { content: ContentService::new(store) }
    }

    pub fn configured(self, cfg: &configs::ContentConfig) -> Self {
        Self { content: self.content.configured(cfg) }
    }

    /// Accept a contact form submission; new leads start as `new`.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use models::lead::LeadForm;
    /// use service::leads::LeadService;
    /// use service::store::MemoryStore;
    /// let svc = LeadService::new(Arc::new(MemoryStore::<models::lead::Model>::new()));
    /// let form = LeadForm {
    ///     name: "Ada".into(),
    ///     email: "ada@example.com".into(),
    ///     message: "Hello".into(),
    ///     ..Default::default()
    /// };
    /// let lead = tokio_test::block_on(svc.submit(form)).unwrap();
    /// assert_eq!(lead.status, "new");
    /// ```
    #[instrument(skip(self, form))]
    pub async fn submit(&self, form: LeadForm) -> Result<lead::Model, ServiceError> {
        let lead = self.content.create(form).await?.record;
        LEADS_SUBMITTED_TOTAL.inc();
        info!(lead_id = %lead.id, source = lead.source.as_deref().unwrap_or("direct"), "lead_submitted");
        Ok(lead)
    }

    pub fn parse_query(&self, pairs: &HashMap<String, String>) -> Result<ListQuery, ServiceError> {
        self.content.parse_query(pairs)
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<lead::Model>, ServiceError> {
        self.content.list(query).await
    }

    pub async fn get(&self, id: Uuid) -> Result<lead::Model, ServiceError> {
        Ok(self.content.get(id).await?.record)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        self.content.delete(id).await
    }

    /// Move a lead to another status, optionally replacing its notes.
    #[instrument(skip(self, update))]
    pub async fn set_status(&self, id: Uuid, update: LeadStatusUpdate) -> Result<lead::Model, ServiceError> {
        let (lead, status): (lead::Model, LeadStatus) = self.content.modify(id, |l| update.apply_to(l)).await?;
        info!(lead_id = %lead.id, status = %status, "lead_status_changed");
        Ok(lead)
    }
}
