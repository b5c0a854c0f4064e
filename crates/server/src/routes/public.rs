//! Read-only content for the public site; unpublished rows are invisible.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use common::pagination::{Page, Pagination};
use models::{blog, category, project, service as svc, subservice, FieldValue, Record};
use serde::{Deserialize, Serialize};
use service::{ContentService, Entry, ListQuery};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::leads;
use crate::state::ServerState;

/// Published subservices shown under a service page; more than this is a
/// data problem, not a paging concern.
const SUBSERVICES_PER_SERVICE: u32 = 100;

#[derive(Debug, Serialize, Deserialize)]
pub struct ServicePage {
    #[serde(flatten)]
    pub service: Entry<svc::Model>,
    pub subservices: Vec<subservice::Model>,
}

fn is_published<M: Record>(record: &M) -> bool {
    !matches!(record.field("published"), Some(FieldValue::Bool(false)))
}

async fn published_list<M: Record>(
    svc: &ContentService<M>,
    pairs: &HashMap<String, String>,
) -> Result<Page<M>, JsonApiError> {
    let mut query = svc.parse_query(pairs)?;
    if M::filter_kind("published").is_some() {
        query = query.with_filter("published", true);
    }
    Ok(svc.list(&query).await?)
}

async fn published_entry<M: Record>(svc: &ContentService<M>, slug: &str) -> Result<Entry<M>, JsonApiError> {
    let entry = svc.get_by_slug(slug).await?;
    if !is_published(&entry.record) {
        return Err(JsonApiError::not_found(M::KIND));
    }
    Ok(entry)
}

#[utoipa::path(get, path = "/api/categories", tag = "public", responses((status = 200, description = "Categories")))]
pub async fn list_categories(
    State(state): State<ServerState>,
    Query(pairs): Query<HashMap<String, String>>,
) -> Result<Json<Page<category::Model>>, JsonApiError> {
    Ok(Json(published_list(&state.categories, &pairs).await?))
}

#[utoipa::path(
    get, path = "/api/blogs", tag = "public",
    params(
        ("q" = Option<String>, Query, description = "Search term"),
        ("category_id" = Option<Uuid>, Query, description = "Category filter"),
        ("page" = Option<u32>, Query, description = "1-based page"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    responses((status = 200, description = "Published posts"), (status = 400, description = "Bad Query", body = crate::openapi::ErrorBodyDoc))
)]
pub async fn list_blogs(
    State(state): State<ServerState>,
    Query(pairs): Query<HashMap<String, String>>,
) -> Result<Json<Page<blog::Model>>, JsonApiError> {
    Ok(Json(published_list(&state.blogs, &pairs).await?))
}

#[utoipa::path(
    get, path = "/api/blogs/{slug}", tag = "public",
    params(("slug" = String, Path, description = "Post slug")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc))
)]
pub async fn get_blog(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> Result<Json<blog::Model>, JsonApiError> {
    Ok(Json(published_entry(&state.blogs, &slug).await?.record))
}

#[utoipa::path(get, path = "/api/projects", tag = "public", responses((status = 200, description = "Published projects")))]
pub async fn list_projects(
    State(state): State<ServerState>,
    Query(pairs): Query<HashMap<String, String>>,
) -> Result<Json<Page<project::Model>>, JsonApiError> {
    Ok(Json(published_list(&state.projects, &pairs).await?))
}

#[utoipa::path(
    get, path = "/api/projects/{slug}", tag = "public",
    params(("slug" = String, Path, description = "Project slug")),
    responses((status = 200, description = "Project with gallery"), (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc))
)]
pub async fn get_project(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> Result<Json<Entry<project::Model>>, JsonApiError> {
    Ok(Json(published_entry(&state.projects, &slug).await?))
}

#[utoipa::path(get, path = "/api/services", tag = "public", responses((status = 200, description = "Published services")))]
pub async fn list_services(
    State(state): State<ServerState>,
    Query(pairs): Query<HashMap<String, String>>,
) -> Result<Json<Page<svc::Model>>, JsonApiError> {
    Ok(Json(published_list(&state.services, &pairs).await?))
}

#[utoipa::path(
    get, path = "/api/services/{slug}", tag = "public",
    params(("slug" = String, Path, description = "Service slug")),
    responses((status = 200, description = "Service with gallery and subservices"), (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc))
)]
pub async fn get_service(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> Result<Json<ServicePage>, JsonApiError> {
    let service = published_entry(&state.services, &slug).await?;
    let query = ListQuery::default()
        .with_filter("service_id", service.record.id)
        .with_filter("published", true)
        .with_window(Pagination { page: 1, per_page: SUBSERVICES_PER_SERVICE });
    let subservices = state.subservices.list(&query).await?.items;
    Ok(Json(ServicePage { service, subservices }))
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/categories", get(list_categories))
        .route("/api/blogs", get(list_blogs))
        .route("/api/blogs/:slug", get(get_blog))
        .route("/api/projects", get(list_projects))
        .route("/api/projects/:slug", get(get_project))
        .route("/api/services", get(list_services))
        .route("/api/services/:slug", get(get_service))
        .merge(leads::public_router())
}
