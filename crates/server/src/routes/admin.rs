//! Admin CRUD, one generic handler set instantiated per content type.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use common::pagination::Page;
use common::types::SlugStatus;
use models::{blog, category, project, service as svc, subservice, Form, Record};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use service::{ContentService, Entry};
use tracing::info;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// A content type exposed under `/admin/{PATH}`.
pub trait AdminResource: Send + Sync + 'static {
    type Model: Record + Serialize;
    type Form: Form<Model = Self::Model> + DeserializeOwned;
    const PATH: &'static str;

    fn service(state: &ServerState) -> &ContentService<Self::Model>;
}

pub struct Categories;
pub struct Blogs;
pub struct Projects;
pub struct Services;
pub struct Subservices;

impl AdminResource for Categories {
    type Model = category::Model;
    type Form = category::CategoryForm;
    const PATH: &'static str = "categories";
    fn service(state: &ServerState) -> &ContentService<Self::Model> { &state.categories }
}

impl AdminResource for Blogs {
    type Model = blog::Model;
    type Form = blog::BlogForm;
    const PATH: &'static str = "blogs";
    fn service(state: &ServerState) -> &ContentService<Self::Model> { &state.blogs }
}

impl AdminResource for Projects {
    type Model = project::Model;
    type Form = project::ProjectForm;
    const PATH: &'static str = "projects";
    fn service(state: &ServerState) -> &ContentService<Self::Model> { &state.projects }
}

impl AdminResource for Services {
    type Model = svc::Model;
    type Form = svc::ServiceForm;
    const PATH: &'static str = "services";
    fn service(state: &ServerState) -> &ContentService<Self::Model> { &state.services }
}

impl AdminResource for Subservices {
    type Model = subservice::Model;
    type Form = subservice::SubserviceForm;
    const PATH: &'static str = "subservices";
    fn service(state: &ServerState) -> &ContentService<Self::Model> { &state.subservices }
}

#[derive(Debug, Deserialize)]
pub struct SlugCheck {
    #[serde(default)]
    pub slug: String,
    pub exclude: Option<Uuid>,
}

pub async fn list<R: AdminResource>(
    State(state): State<ServerState>,
    Query(pairs): Query<HashMap<String, String>>,
) -> Result<Json<Page<R::Model>>, JsonApiError> {
    let svc = R::service(&state);
    let query = svc.parse_query(&pairs)?;
    let page = svc.list(&query).await?;
    info!(kind = R::PATH, count = page.items.len(), total = page.total, "admin_list");
    Ok(Json(page))
}

pub async fn create<R: AdminResource>(
    State(state): State<ServerState>,
    Json(form): Json<R::Form>,
) -> Result<(StatusCode, Json<Entry<R::Model>>), JsonApiError> {
    let entry = R::service(&state).create(form).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_one<R: AdminResource>(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Entry<R::Model>>, JsonApiError> {
    Ok(Json(R::service(&state).get(id).await?))
}

pub async fn update<R: AdminResource>(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(form): Json<R::Form>,
) -> Result<Json<Entry<R::Model>>, JsonApiError> {
    Ok(Json(R::service(&state).update(id, form).await?))
}

pub async fn remove<R: AdminResource>(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    if R::service(&state).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found(<R::Model as Record>::KIND))
    }
}

pub async fn slug_check<R: AdminResource>(
    State(state): State<ServerState>,
    Query(q): Query<SlugCheck>,
) -> Result<Json<SlugStatus>, JsonApiError> {
    Ok(Json(R::service(&state).slug_status(&q.slug, q.exclude).await?))
}

fn resource<R: AdminResource>() -> Router<ServerState> {
    let base = format!("/admin/{}", R::PATH);
    Router::new()
        .route(&base, get(list::<R>).post(create::<R>))
        .route(&format!("{base}/slug-check"), get(slug_check::<R>))
        .route(&format!("{base}/:id"), get(get_one::<R>).put(update::<R>).delete(remove::<R>))
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(resource::<Categories>())
        .merge(resource::<Blogs>())
        .merge(resource::<Projects>())
        .merge(resource::<Services>())
        .merge(resource::<Subservices>())
}
