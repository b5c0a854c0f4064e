use models::ValidationErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A list query parameter could not be understood.
    #[error("bad query: {0}")]
    BadQuery(ValidationErrors),
    /// One or more form fields failed validation.
    #[error("invalid input: {0}")]
    Invalid(ValidationErrors),
    /// The write would collide with another record, usually on `slug`.
    #[error("conflict: {0}")]
    Conflict(ValidationErrors),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Db(e.to_string()) }
}
