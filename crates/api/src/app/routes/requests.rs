use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use procura_core::RequestId;
use procura_engine::NewRequest;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_request).get(list_requests))
        .route("/pending", get(list_pending))
        .route("/reviewed", get(list_reviewed))
        .route("/:id", get(get_request).patch(update_request))
        .route("/:id/approve", post(approve_request))
        .route("/:id/reject", post(reject_request))
        .route("/:id/receipt", post(submit_receipt))
        .route("/:id/order", get(get_order))
}

fn parse_request_id(id: &str) -> Result<RequestId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid request id")
    })
}

pub async fn create_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateRequestBody>,
) -> axum::response::Response {
    let required_levels = match dto::parse_levels(body.required_levels) {
        Ok(v) => v,
        Err(e) => return errors::workflow_error_to_response(e),
    };

    let new_request = NewRequest {
        title: body.title,
        description: body.description,
        items: body.items.into_iter().map(dto::ItemBody::into_item).collect(),
        required_levels,
    };

    match services.lifecycle.create(principal.principal(), new_request) {
        Ok(request) => {
            (StatusCode::CREATED, Json(dto::request_to_json(&request))).into_response()
        }
        Err(e) => errors::workflow_error_to_response(e),
    }
}

pub async fn list_requests(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    let requests = services.lifecycle.list_for(principal.principal());
    Json(requests.iter().map(dto::request_to_json).collect::<Vec<_>>()).into_response()
}

pub async fn get_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let request_id = match parse_request_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.lifecycle.get(principal.principal(), request_id) {
        Ok(request) => Json(dto::request_to_json(&request)).into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}

pub async fn update_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateRequestBody>,
) -> axum::response::Response {
    let request_id = match parse_request_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .lifecycle
        .update(principal.principal(), request_id, body.into_update())
    {
        Ok(request) => Json(dto::request_to_json(&request)).into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}

pub async fn approve_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::DecisionBody>,
) -> axum::response::Response {
    let request_id = match parse_request_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .engine
        .approve(principal.principal(), request_id, body.comment)
    {
        Ok(request) => Json(dto::request_to_json(&request)).into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}

pub async fn reject_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::DecisionBody>,
) -> axum::response::Response {
    let request_id = match parse_request_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .engine
        .reject(principal.principal(), request_id, body.comment)
    {
        Ok(request) => Json(dto::request_to_json(&request)).into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}

pub async fn submit_receipt(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::ReceiptBody>,
) -> axum::response::Response {
    let request_id = match parse_request_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .lifecycle
        .submit_receipt(principal.principal(), request_id, body.file_name)
    {
        Ok(request) => Json(dto::request_to_json(&request)).into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let request_id = match parse_request_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.lifecycle.order_for(principal.principal(), request_id) {
        Ok(Some(order)) => Json(dto::order_to_json(&order)).into_response(),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "no purchase order for this request",
        ),
        Err(e) => errors::workflow_error_to_response(e),
    }
}

pub async fn list_pending(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.lifecycle.list_pending(principal.principal()) {
        Ok(requests) => {
            Json(requests.iter().map(dto::request_to_json).collect::<Vec<_>>()).into_response()
        }
        Err(e) => errors::workflow_error_to_response(e),
    }
}

pub async fn list_reviewed(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.lifecycle.list_reviewed(principal.principal()) {
        Ok(requests) => {
            Json(requests.iter().map(dto::request_to_json).collect::<Vec<_>>()).into_response()
        }
        Err(e) => errors::workflow_error_to_response(e),
    }
}
