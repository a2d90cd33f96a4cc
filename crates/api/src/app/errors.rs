use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use procura_core::WorkflowError;

pub fn workflow_error_to_response(err: WorkflowError) -> axum::response::Response {
    match err {
        WorkflowError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        WorkflowError::Forbidden(msg) => json_error(StatusCode::FORBIDDEN, "forbidden", msg),
        WorkflowError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        WorkflowError::InvalidState(msg) => json_error(StatusCode::CONFLICT, "invalid_state", msg),
        WorkflowError::DuplicateAction(msg) => {
            json_error(StatusCode::CONFLICT, "duplicate_action", msg)
        }
        WorkflowError::AlreadyRejected => json_error(
            StatusCode::CONFLICT,
            "already_rejected",
            "request already rejected",
        ),
        WorkflowError::MissingProforma(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "missing_proforma", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
