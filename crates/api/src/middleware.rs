//! Identity middleware.
//!
//! Authentication happens upstream (gateway/identity provider); this service
//! trusts the `x-user-id` and `x-roles` headers it forwards. Role names are
//! parsed once here; unrecognized names are dropped, not rejected, so a user
//! with no usable role simply has no capabilities.

use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use procura_auth::{Principal, Role};
use procura_core::UserId;

use crate::context::PrincipalContext;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const ROLES_HEADER: &str = "x-roles";

pub async fn identity_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let principal = resolve_principal(req.headers())?;
    req.extensions_mut().insert(PrincipalContext::new(principal));
    Ok(next.run(req).await)
}

fn resolve_principal(headers: &HeaderMap) -> Result<Principal, StatusCode> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let user_id: UserId = user_id
        .trim()
        .parse()
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let roles = headers
        .get(ROLES_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let roles: Vec<Role> = roles
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter_map(|name| match name.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::debug!(role = name, error = %e, "dropping unrecognized role");
                None
            }
        })
        .collect();

    Ok(Principal::new(user_id, roles))
}
