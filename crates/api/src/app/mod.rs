//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: engine/lifecycle wiring over the in-memory store and bus
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use procura_engine::WorkflowConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: WorkflowConfig) -> Router {
    let services = Arc::new(services::build_services(config));

    // Protected routes: require a resolved principal.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn(middleware::identity_middleware));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
}
