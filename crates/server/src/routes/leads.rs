use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, FixedOffset};
use common::pagination::Page;
use models::lead::{self, LeadForm, LeadStatusUpdate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// What a visitor learns about their submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct LeadReceipt {
    pub id: Uuid,
    pub received_at: DateTime<FixedOffset>,
}

#[utoipa::path(
    post, path = "/api/leads", tag = "public",
    request_body = crate::openapi::LeadFormDoc,
    responses(
        (status = 201, description = "Received"),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn submit(
    State(state): State<ServerState>,
    Json(form): Json<LeadForm>,
) -> Result<(StatusCode, Json<LeadReceipt>), JsonApiError> {
    let lead = state.leads.submit(form).await?;
    Ok((StatusCode::CREATED, Json(LeadReceipt { id: lead.id, received_at: lead.created_at })))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(pairs): Query<HashMap<String, String>>,
) -> Result<Json<Page<lead::Model>>, JsonApiError> {
    let query = state.leads.parse_query(&pairs)?;
    Ok(Json(state.leads.list(&query).await?))
}

pub async fn get_one(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<lead::Model>, JsonApiError> {
    Ok(Json(state.leads.get(id).await?))
}

pub async fn remove(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    if state.leads.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("lead"))
    }
}

pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(update): Json<LeadStatusUpdate>,
) -> Result<Json<lead::Model>, JsonApiError> {
    Ok(Json(state.leads.set_status(id, update).await?))
}

pub fn public_router() -> Router<ServerState> {
    Router::new().route("/api/leads", post(submit))
}

pub fn admin_router() -> Router<ServerState> {
    Router::new()
        .route("/admin/leads", get(list))
        .route("/admin/leads/:id", get(get_one).delete(remove))
        .route("/admin/leads/:id/status", patch(set_status))
}
