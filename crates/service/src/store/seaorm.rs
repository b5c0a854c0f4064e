//! SQL-backed store for any sea-orm entity whose model is a [`Record`].

use std::marker::PhantomData;

use async_trait::async_trait;
use common::pagination::Page;
use models::{FieldValue, Record, SortOrder, ValidationErrors};
use sea_orm::sea_query::{Expr, Func, LikeExpr, NullOrdering, SimpleExpr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ColumnType, Condition, DatabaseConnection, DbErr,
    EntityTrait, IdenStatic, IntoActiveModel, Iterable, Order, PaginatorTrait, PrimaryKeyTrait, QueryFilter,
    QueryOrder, SqlErr,
};
use tracing::debug;
use uuid::Uuid;

use super::RecordStore;
use crate::errors::ServiceError;
use crate::listing::ListQuery;

pub struct SeaOrmStore<E> {
    pub db: DatabaseConnection,
    _entity: PhantomData<fn() -> E>,
}

impl<E> SeaOrmStore<E> {
    pub fn new(db: DatabaseConnection) -> Self { Self { db, _entity: PhantomData } }
}

impl<E> Clone for SeaOrmStore<E> {
    fn clone(&self) -> Self { Self::new(self.db.clone()) }
}

/// Entity column named `name`.
fn column<E: EntityTrait>(name: &str) -> Option<E::Column> {
    E::Column::iter().find(|c| c.as_str() == name)
}

fn is_text<C: ColumnTrait>(col: &C) -> bool {
    matches!(col.def().get_column_type(), ColumnType::String(_) | ColumnType::Text | ColumnType::Char(_))
}

fn col_expr<E: EntityTrait>(col: E::Column) -> Expr {
    Expr::col((E::default(), col))
}

/// `%` and `_` in user input match literally.
fn like_pattern(term: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape('\\')
}

fn map_write_err<M: Record>(e: DbErr, record: &M) -> ServiceError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            debug!(kind = M::KIND, %detail, "unique violation on write");
            ServiceError::Conflict(ValidationErrors::single("slug", "is already in use"))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            ServiceError::Invalid(ValidationErrors::single("id", format!("references a missing row: {detail}")))
        }
        _ => match e {
            DbErr::RecordNotUpdated => ServiceError::NotFound(format!("{} {} not found", M::KIND, record.id())),
            other => ServiceError::Db(other.to_string()),
        },
    }
}

#[async_trait]
impl<E> RecordStore<E::Model> for SeaOrmStore<E>
where
    E: EntityTrait,
    E::Model: Record + IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = Uuid>,
{
    async fn list(&self, query: &ListQuery) -> Result<Page<E::Model>, ServiceError> {
        let mut select = E::find();

        if let Some(term) = &query.search {
            let pattern = like_pattern(term);
            let mut any = Condition::any();
            for name in <E::Model as Record>::SEARCH_COLUMNS {
                if let Some(col) = column::<E>(name) {
                    any = any.add(Expr::expr(Func::lower(col_expr::<E>(col))).like(pattern.clone()));
                }
            }
            select = select.filter(any);
        }

        for (name, value) in &query.filters {
            let Some(col) = column::<E>(name) else { continue };
            select = match value {
                FieldValue::Null => select.filter(col.is_null()),
                v => select.filter(col.eq(v.clone())),
            };
        }

        let (sort_col, order) = query.effective_sort::<E::Model>();
        if let Some(col) = column::<E>(sort_col) {
            let key: SimpleExpr = if is_text(&col) {
                Func::lower(col_expr::<E>(col)).into()
            } else {
                col_expr::<E>(col).into()
            };
            let (ord, nulls) = match order {
                SortOrder::Asc => (Order::Asc, NullOrdering::First),
                SortOrder::Desc => (Order::Desc, NullOrdering::Last),
            };
            select = select.order_by_with_nulls(key, ord, nulls);
        }
        if let Some(id) = column::<E>("id") {
            select = select.order_by_asc(id);
        }

        let window = query.window;
        let paginator = select.paginate(&self.db, window.per_page.max(1) as u64);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(window.page.max(1) as u64 - 1).await?;
        Ok(Page::new(items, total, window))
    }

    async fn get(&self, id: Uuid) -> Result<Option<E::Model>, ServiceError> {
        Ok(E::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<E::Model>, ServiceError> {
        let Some(col) = column::<E>("slug") else { return Ok(None) };
        Ok(E::find().filter(col.eq(slug)).one(&self.db).await?)
    }

    async fn insert(&self, record: E::Model) -> Result<E::Model, ServiceError> {
        let am = models::db::all_set::<E>(record.clone());
        am.insert(&self.db).await.map_err(|e| map_write_err(e, &record))
    }

    async fn update(&self, record: E::Model) -> Result<E::Model, ServiceError> {
        let am = models::db::all_set::<E>(record.clone());
        am.update(&self.db).await.map_err(|e| map_write_err(e, &record))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = E::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::category;

    #[test]
    fn resolves_columns_by_name() {
        assert!(matches!(column::<category::Entity>("slug"), Some(category::Column::Slug)));
        assert!(column::<category::Entity>("password").is_none());
        assert!(is_text(&category::Column::Name));
        assert!(!is_text(&category::Column::CreatedAt));
    }
}

#[cfg(test)]
mod db_tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use models::blog::{self, BlogForm};
    use models::category::{self, CategoryForm};
    use uuid::Uuid;

    use super::SeaOrmStore;
    use crate::content::ContentService;
    use crate::errors::ServiceError;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn sql_listing_matches_memory_semantics() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let cats = Arc::new(ContentService::<category::Model>::new(Arc::new(SeaOrmStore::<category::Entity>::new(db.clone()))));
        let blogs = ContentService::<blog::Model>::new(Arc::new(SeaOrmStore::<blog::Entity>::new(db.clone())))
            .with_parent(cats.clone());

        let tag = Uuid::new_v4().simple().to_string();
        let cat = cats.create(CategoryForm { name: format!("Cat {tag}"), ..Default::default() }).await?;
        for (title, published) in [("beta", true), ("Alpha", true), ("gamma", false)] {
            blogs
                .create(BlogForm {
                    title: format!("{title} {tag}"),
                    content: "body".into(),
                    category_id: Some(cat.record.id),
                    published,
                    ..Default::default()
                })
                .await?;
        }

        let pairs: HashMap<String, String> = [
            ("q", tag.to_uppercase()),
            ("published", "true".to_string()),
            ("sort", "title".to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        let q = blogs.parse_query(&pairs)?;
        let page = blogs.list(&q).await?;
        assert_eq!(page.total, 2);
        assert!(page.items[0].title.starts_with("Alpha"));
        assert!(page.items[1].title.starts_with("beta"));

        let dup = blogs
            .create(BlogForm {
                title: "x".into(),
                slug: Some(page.items[0].slug.clone()),
                content: "body".into(),
                ..Default::default()
            })
            .await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        for b in page.items {
            blogs.delete(b.id).await?;
        }
        let rest = blogs.parse_query(&[("q".to_string(), tag.clone())].into_iter().collect())?;
        for b in blogs.list(&rest).await?.items {
            blogs.delete(b.id).await?;
        }
        assert!(cats.delete(cat.record.id).await?);
        Ok(())
    }
}
