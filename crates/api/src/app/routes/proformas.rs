use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use procura_extract::Document;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new().route("/", post(upload_proforma))
}

/// Upload a proforma document. Extraction is best-effort; the response
/// carries the proforma, the seeded request and the draft purchase order.
pub async fn upload_proforma(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::UploadProformaBody>,
) -> axum::response::Response {
    let document = Document::new(body.file_name, body.content.into_bytes());

    match services
        .lifecycle
        .upload_proforma(principal.principal(), document)
    {
        Ok(upload) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "proforma": dto::proforma_to_json(&upload.proforma),
                "request": dto::request_to_json(&upload.request),
                "order": dto::order_to_json(&upload.order),
            })),
        )
            .into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}
