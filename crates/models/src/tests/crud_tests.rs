use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use uuid::Uuid;

use super::test_db;
use crate::db::all_set;
use crate::form::{Form, FormLimits};
use crate::{blog, category, gallery_image, lead, service, subservice};

#[tokio::test]
async fn category_blog_round_trip() -> anyhow::Result<()> {
    let Some(db) = test_db().await else { return Ok(()) };
    let txn = db.begin().await?;
    let now = Utc::now().into();

    let cat_slug = format!("news-{}", Uuid::new_v4().simple());
    let cat = category::CategoryForm { name: "News".into(), ..Default::default() }
        .build(Uuid::new_v4(), Some(cat_slug.clone()), now);
    let cat = all_set::<category::Entity>(cat).insert(&txn).await?;
    assert_eq!(cat.slug, cat_slug);

    let post = blog::BlogForm {
        title: "Hello".into(),
        content: "Body".into(),
        category_id: Some(cat.id),
        published: true,
        ..Default::default()
    }
    .build(Uuid::new_v4(), Some(format!("hello-{}", Uuid::new_v4().simple())), now);
    let post = all_set::<blog::Entity>(post).insert(&txn).await?;
    assert!(post.published_at.is_some());

    let found = blog::Entity::find()
        .filter(blog::Column::CategoryId.eq(cat.id))
        .all(&txn)
        .await?;
    assert_eq!(found.len(), 1);

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn subservices_follow_their_service() -> anyhow::Result<()> {
    let Some(db) = test_db().await else { return Ok(()) };
    let txn = db.begin().await?;
    let now = Utc::now().into();

    let svc = service::ServiceForm { title: "Design".into(), description: "d".into(), ..Default::default() }
        .build(Uuid::new_v4(), Some(format!("design-{}", Uuid::new_v4().simple())), now);
    let svc = all_set::<service::Entity>(svc).insert(&txn).await?;
    for (i, title) in ["Logos", "Brand books"].iter().enumerate() {
        let sub = subservice::SubserviceForm {
            service_id: Some(svc.id),
            title: title.to_string(),
            description: "d".into(),
            position: i as i32,
            ..Default::default()
        }
        .build(Uuid::new_v4(), Some(format!("sub-{}", Uuid::new_v4().simple())), now);
        all_set::<subservice::Entity>(sub).insert(&txn).await?;
    }
    let subs = subservice::Entity::find()
        .filter(subservice::Column::ServiceId.eq(svc.id))
        .order_by_asc(subservice::Column::Position)
        .all(&txn)
        .await?;
    assert_eq!(subs.iter().map(|s| s.title.as_str()).collect::<Vec<_>>(), vec!["Logos", "Brand books"]);

    service::Entity::delete_by_id(svc.id).exec(&txn).await?;
    let left = subservice::Entity::find()
        .filter(subservice::Column::ServiceId.eq(svc.id))
        .all(&txn)
        .await?;
    assert!(left.is_empty(), "subservices cascade with their service");

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn lead_and_gallery_rows_persist() -> anyhow::Result<()> {
    let Some(db) = test_db().await else { return Ok(()) };
    let txn = db.begin().await?;
    let now = Utc::now().into();

    let form = lead::LeadForm {
        name: "Grace".into(),
        email: "grace@example.com".into(),
        message: "Hi".into(),
        ..Default::default()
    };
    assert!(form.validate(&FormLimits::default()).is_empty());
    let saved = all_set::<lead::Entity>(form.build(Uuid::new_v4(), None, now)).insert(&txn).await?;
    assert_eq!(saved.status, "new");

    let owner_id = Uuid::new_v4();
    let row = gallery_image::Model {
        id: Uuid::new_v4(),
        owner_kind: gallery_image::OwnerKind::Project.as_str().to_string(),
        owner_id,
        image_url: "/img/a.jpg".into(),
        position: 0,
        created_at: now,
    };
    all_set::<gallery_image::Entity>(row).insert(&txn).await?;
    let rows = gallery_image::Entity::find()
        .filter(gallery_image::Column::OwnerId.eq(owner_id))
        .all(&txn)
        .await?;
    assert_eq!(rows.len(), 1);

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn connection_answers_ping() -> anyhow::Result<()> {
    let Some(db) = test_db().await else { return Ok(()) };
    crate::db::test_connection(&db).await?;
    Ok(())
}
