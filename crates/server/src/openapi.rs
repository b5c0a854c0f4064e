//! OpenAPI document for the operational and public endpoints.

use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct FieldErrorDoc { pub field: String, pub message: String }

#[derive(ToSchema)]
pub struct ErrorBodyDoc {
    pub error: String,
    pub message: Option<String>,
    pub fields: Option<Vec<FieldErrorDoc>>,
    pub focus: Option<String>,
}

#[derive(ToSchema)]
pub struct SlugStatusDoc { pub slug: String, pub available: bool }

#[derive(ToSchema)]
pub struct CategoryFormDoc { pub name: String, pub slug: Option<String>, pub description: Option<String> }

#[derive(ToSchema)]
pub struct BlogFormDoc {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub category_id: Option<Uuid>,
    pub author: Option<String>,
    pub published: bool,
}

#[derive(ToSchema)]
pub struct ProjectFormDoc {
    pub title: String,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub description: String,
    pub client: Option<String>,
    pub cover_image: Option<String>,
    pub category_id: Option<Uuid>,
    pub featured: bool,
    pub published: bool,
    pub gallery: Vec<String>,
}

#[derive(ToSchema)]
pub struct ServiceFormDoc {
    pub title: String,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub description: String,
    pub icon: Option<String>,
    pub cover_image: Option<String>,
    pub position: i32,
    pub published: bool,
    pub gallery: Vec<String>,
}

#[derive(ToSchema)]
pub struct SubserviceFormDoc {
    pub service_id: Uuid,
    pub title: String,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub description: String,
    pub position: i32,
    pub published: bool,
}

#[derive(ToSchema)]
pub struct LeadFormDoc {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: String,
    pub source: Option<String>,
}

#[derive(ToSchema)]
pub struct LeadStatusUpdateDoc {
    /// One of `new`, `contacted`, `qualified`, `closed`.
    pub status: String,
    pub notes: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::public::list_categories,
        crate::routes::public::list_blogs,
        crate::routes::public::get_blog,
        crate::routes::public::list_projects,
        crate::routes::public::get_project,
        crate::routes::public::list_services,
        crate::routes::public::get_service,
        crate::routes::leads::submit,
    ),
    components(
        schemas(
            HealthResponse,
            FieldErrorDoc,
            ErrorBodyDoc,
            SlugStatusDoc,
            CategoryFormDoc,
            BlogFormDoc,
            ProjectFormDoc,
            ServiceFormDoc,
            SubserviceFormDoc,
            LeadFormDoc,
            LeadStatusUpdateDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "public")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_public_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/api/services/{slug}"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/leads"));
        assert!(doc.components.is_some());
    }
}
