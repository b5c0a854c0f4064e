use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// Key from the `X-API-Key` header, else the `api_key` query parameter.
fn presented_key(req: &Request) -> Option<String> {
    let from_header = req
        .headers()
        .get("X-API-Key")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    from_header.or_else(|| {
        req.uri().query().and_then(|q| {
            q.split('&').find_map(|pair| {
                let mut it = pair.splitn(2, '=');
                match (it.next(), it.next()) {
                    (Some("api_key"), Some(v)) => Some(v.to_string()),
                    _ => None,
                }
            })
        })
    })
}

/// Middleware: require a configured admin key on `/admin` routes.
pub async fn require_admin_key(State(state): State<ServerState>, req: Request, next: Next) -> Response {
    if state.admin_open() {
        return next.run(req).await;
    }
    let ok = match presented_key(&req) {
        Some(k) if !k.trim().is_empty() => state.admin_keys.iter().any(|v| v == k.trim()),
        _ => false,
    };
    if !ok {
        warn!(path = %req.uri().path(), "admin request rejected");
        return JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some("missing or invalid API key".into()))
            .into_response();
    }
    next.run(req).await
}
