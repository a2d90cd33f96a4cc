use axum::{Router, routing::get};

pub mod finance;
pub mod proformas;
pub mod requests;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/me", get(system::me))
        .nest("/requests", requests::router())
        .nest("/proformas", proformas::router())
        .nest("/finance", finance::router())
}
