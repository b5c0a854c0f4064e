use async_trait::async_trait;
use chrono::Utc;
use models::gallery_image::{self, Owner};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use uuid::Uuid;

use super::{GalleryStore, SyncPlan};
use crate::errors::ServiceError;

pub struct SeaOrmGallery {
    pub db: DatabaseConnection,
}

impl SeaOrmGallery {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl GalleryStore for SeaOrmGallery {
    async fn list(&self, owner: Owner) -> Result<Vec<gallery_image::Model>, ServiceError> {
        let rows = gallery_image::Entity::find()
            .filter(gallery_image::Column::OwnerKind.eq(owner.kind.as_str()))
            .filter(gallery_image::Column::OwnerId.eq(owner.id))
            .order_by_asc(gallery_image::Column::Position)
            .order_by_asc(gallery_image::Column::CreatedAt)
            .order_by_asc(gallery_image::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn apply(&self, owner: Owner, plan: &SyncPlan) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        if !plan.delete.is_empty() {
            gallery_image::Entity::delete_many()
                .filter(gallery_image::Column::Id.is_in(plan.delete.clone()))
                .exec(&txn)
                .await?;
        }
        for (id, position) in &plan.reposition {
            gallery_image::Entity::update_many()
                .col_expr(gallery_image::Column::Position, Expr::value(*position))
                .filter(gallery_image::Column::Id.eq(*id))
                .exec(&txn)
                .await?;
        }
        if !plan.insert.is_empty() {
            let now = Utc::now();
            let rows = plan.insert.iter().map(|n| gallery_image::ActiveModel {
                id: Set(Uuid::new_v4()),
                owner_kind: Set(owner.kind.as_str().to_string()),
                owner_id: Set(owner.id),
                image_url: Set(n.image_url.clone()),
                position: Set(n.position),
                created_at: Set(now.into()),
            });
            gallery_image::Entity::insert_many(rows).exec(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn clear(&self, owner: Owner) -> Result<u64, ServiceError> {
        let res = gallery_image::Entity::delete_many()
            .filter(gallery_image::Column::OwnerKind.eq(owner.kind.as_str()))
            .filter(gallery_image::Column::OwnerId.eq(owner.id))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }
}
