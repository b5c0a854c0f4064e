//! Gallery reconciliation: an ordered list of image URLs from the editor is
//! diffed against the persisted rows of its owner.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use models::gallery_image::{self, Owner};
use uuid::Uuid;

use crate::errors::ServiceError;

pub mod seaorm;

pub use seaorm::SeaOrmGallery;

/// Row to create at `position`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewImage {
    pub image_url: String,
    pub position: i32,
}

/// Minimal set of writes turning the stored gallery into the desired one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub delete: Vec<Uuid>,
    pub insert: Vec<NewImage>,
    /// Kept rows whose position changes: `(row id, new position)`.
    pub reposition: Vec<(Uuid, i32)>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.delete.is_empty() && self.insert.is_empty() && self.reposition.is_empty()
    }
}

/// Desired URLs trimmed, blanks dropped, first occurrence kept.
pub fn normalize(desired: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    desired
        .iter()
        .map(|u| u.trim())
        .filter(|u| !u.is_empty() && seen.insert(*u))
        .map(str::to_string)
        .collect()
}

/// Diff `existing` rows against the `desired` order.
///
/// ```
/// use service::gallery::plan_sync;
/// let desired = vec!["/a.jpg".to_string(), "/b.jpg".to_string()];
/// let plan = plan_sync(&[], &desired);
/// assert_eq!(plan.insert.len(), 2);
/// assert!(plan.delete.is_empty());
/// ```
pub fn plan_sync(existing: &[gallery_image::Model], desired: &[String]) -> SyncPlan {
    let desired = normalize(desired);
    let wanted: HashMap<&str, i32> = desired.iter().enumerate().map(|(i, u)| (u.as_str(), i as i32)).collect();

    let mut rows: Vec<&gallery_image::Model> = existing.iter().collect();
    rows.sort_by_key(|r| (r.position, r.created_at, r.id));

    let mut plan = SyncPlan::default();
    let mut kept: HashSet<&str> = HashSet::new();
    for row in rows {
        match wanted.get(row.image_url.as_str()) {
            Some(&pos) if kept.insert(row.image_url.as_str()) => {
                if row.position != pos {
                    plan.reposition.push((row.id, pos));
                }
            }
            _ => plan.delete.push(row.id),
        }
    }
    for (i, url) in desired.iter().enumerate() {
        if !kept.contains(url.as_str()) {
            plan.insert.push(NewImage { image_url: url.clone(), position: i as i32 });
        }
    }
    plan
}

/// Persisted gallery rows, grouped by owner.
#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// Rows of `owner` in display order.
    async fn list(&self, owner: Owner) -> Result<Vec<gallery_image::Model>, ServiceError>;
    /// Apply `plan` atomically.
    async fn apply(&self, owner: Owner, plan: &SyncPlan) -> Result<(), ServiceError>;
    /// Remove every row of `owner`, returning how many went.
    async fn clear(&self, owner: Owner) -> Result<u64, ServiceError>;
}

/// Bring the gallery of `owner` in line with `desired`; returns the stored URLs.
pub async fn sync(store: &dyn GalleryStore, owner: Owner, desired: &[String]) -> Result<Vec<String>, ServiceError> {
    let existing = store.list(owner).await?;
    let plan = plan_sync(&existing, desired);
    if !plan.is_empty() {
        tracing::debug!(
            owner_kind = owner.kind.as_str(),
            owner_id = %owner.id,
            delete = plan.delete.len(),
            insert = plan.insert.len(),
            reposition = plan.reposition.len(),
            "gallery_sync"
        );
        store.apply(owner, &plan).await?;
    }
    Ok(normalize(desired))
}

/// Image URLs of `owner` in display order.
pub async fn urls(store: &dyn GalleryStore, owner: Owner) -> Result<Vec<String>, ServiceError> {
    Ok(store.list(owner).await?.into_iter().map(|r| r.image_url).collect())
}

/// In-memory gallery rows for tests and doc examples.
#[derive(Default)]
pub struct MemoryGallery {
    rows: Mutex<Vec<gallery_image::Model>>,
}

impl MemoryGallery {
    pub fn new() -> Self { Self::default() }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<gallery_image::Model>> {
        self.rows.lock().unwrap_or_else(|p| p.into_inner())
    }
}

fn owned_by(row: &gallery_image::Model, owner: Owner) -> bool {
    row.owner_kind == owner.kind.as_str() && row.owner_id == owner.id
}

#[async_trait]
impl GalleryStore for MemoryGallery {
    async fn list(&self, owner: Owner) -> Result<Vec<gallery_image::Model>, ServiceError> {
        let mut rows: Vec<_> = self.lock().iter().filter(|r| owned_by(r, owner)).cloned().collect();
        rows.sort_by_key(|r| (r.position, r.created_at, r.id));
        Ok(rows)
    }

    async fn apply(&self, owner: Owner, plan: &SyncPlan) -> Result<(), ServiceError> {
        let mut rows = self.lock();
        rows.retain(|r| !plan.delete.contains(&r.id));
        for (id, pos) in &plan.reposition {
            if let Some(r) = rows.iter_mut().find(|r| r.id == *id) {
                r.position = *pos;
            }
        }
        let now = Utc::now().into();
        rows.extend(plan.insert.iter().map(|n| gallery_image::Model {
            id: Uuid::new_v4(),
            owner_kind: owner.kind.as_str().to_string(),
            owner_id: owner.id,
            image_url: n.image_url.clone(),
            position: n.position,
            created_at: now,
        }));
        Ok(())
    }

    async fn clear(&self, owner: Owner) -> Result<u64, ServiceError> {
        let mut rows = self.lock();
        let before = rows.len();
        rows.retain(|r| !owned_by(r, owner));
        Ok((before - rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::gallery_image::OwnerKind;

    fn row(url: &str, position: i32) -> gallery_image::Model {
        gallery_image::Model {
            id: Uuid::new_v4(),
            owner_kind: "project".into(),
            owner_id: Uuid::nil(),
            image_url: url.into(),
            position,
            created_at: Utc::now().into(),
        }
    }

    fn urls_of(v: &[&str]) -> Vec<String> { v.iter().map(|s| s.to_string()).collect() }

    #[test]
    fn synced_gallery_yields_empty_plan() {
        let existing = vec![row("/a", 0), row("/b", 1)];
        assert!(plan_sync(&existing, &urls_of(&["/a", "/b"])).is_empty());
    }

    #[test]
    fn removes_inserts_and_reorders() {
        let a = row("/a", 0);
        let b = row("/b", 1);
        let c = row("/c", 2);
        let plan = plan_sync(&[a.clone(), b.clone(), c.clone()], &urls_of(&["/c", "/d", "/a"]));
        assert_eq!(plan.delete, vec![b.id]);
        assert_eq!(plan.insert, vec![NewImage { image_url: "/d".into(), position: 1 }]);
        let mut moved = plan.reposition.clone();
        moved.sort_by_key(|(_, p)| *p);
        assert_eq!(moved, vec![(c.id, 0), (a.id, 2)]);
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let first = row("/a", 0);
        let twin = row("/a", 1);
        let plan = plan_sync(&[first.clone(), twin.clone()], &urls_of(&["/a", " /a ", "/b", "/a"]));
        assert_eq!(plan.delete, vec![twin.id]);
        assert_eq!(plan.insert, vec![NewImage { image_url: "/b".into(), position: 1 }]);
        assert!(plan.reposition.is_empty());
    }

    #[test]
    fn empty_desired_deletes_everything() {
        let plan = plan_sync(&[row("/a", 0), row("/b", 1)], &[]);
        assert_eq!(plan.delete.len(), 2);
        assert!(plan.insert.is_empty());
    }

    #[tokio::test]
    async fn memory_gallery_round_trips_order() {
        let store = MemoryGallery::new();
        let owner = Owner { kind: OwnerKind::Service, id: Uuid::new_v4() };
        let other = Owner { kind: OwnerKind::Project, id: owner.id };

        sync(&store, owner, &urls_of(&["/1", "/2", "/3"])).await.unwrap();
        sync(&store, other, &urls_of(&["/x"])).await.unwrap();
        let stored = sync(&store, owner, &urls_of(&["/3", "/1"])).await.unwrap();
        assert_eq!(stored, urls_of(&["/3", "/1"]));
        assert_eq!(urls(&store, owner).await.unwrap(), urls_of(&["/3", "/1"]));

        assert_eq!(store.clear(owner).await.unwrap(), 2);
        assert_eq!(urls(&store, other).await.unwrap(), urls_of(&["/x"]));
    }
}
