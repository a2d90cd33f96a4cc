use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// The caller's resolved identity, as the middleware sees it.
pub async fn me(
    Extension(principal): Extension<crate::context::PrincipalContext>,
) -> impl IntoResponse {
    let principal = principal.principal();
    Json(serde_json::json!({
        "user_id": principal.user_id().to_string(),
        "roles": principal.roles().iter().map(|r| r.to_string()).collect::<Vec<_>>(),
    }))
}
