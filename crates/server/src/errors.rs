use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::ValidationErrors;
use serde::{Deserialize, Serialize};
use service::ServiceError;
use thiserror::Error;
use tracing::error;

/// JSON error body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<ValidationErrors>,
    /// First failing field; the input an editor should focus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
}

#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &str, message: Option<String>) -> Self {
        Self { status, body: ErrorBody { error: title.to_string(), message, fields: None, focus: None } }
    }

    pub fn with_fields(mut self, errs: ValidationErrors) -> Self {
        self.body.focus = errs.focus().map(str::to_string);
        self.body.fields = Some(errs);
        self
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", Some(format!("{what} not found")))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::BadQuery(errs) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Bad Query", Some(errs.to_string())).with_fields(errs)
            }
            ServiceError::Invalid(errs) => {
                JsonApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation Error", Some(errs.to_string()))
                    .with_fields(errs)
            }
            ServiceError::Conflict(errs) => {
                JsonApiError::new(StatusCode::CONFLICT, "Conflict", Some(errs.to_string())).with_fields(errs)
            }
            ServiceError::NotFound(msg) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Db(msg) => {
                error!(error = %msg, "storage failure");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", None)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
