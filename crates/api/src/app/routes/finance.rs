use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    response::IntoResponse,
    routing::get,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new().route("/requests", get(list_approved))
}

/// Finance view over requests that completed their approval quorum.
pub async fn list_approved(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.lifecycle.finance_list(principal.principal()) {
        Ok(requests) => {
            Json(requests.iter().map(dto::request_to_json).collect::<Vec<_>>()).into_response()
        }
        Err(e) => errors::workflow_error_to_response(e),
    }
}
