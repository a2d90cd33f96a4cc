//! Pure authorization boundary for the workflow.
//!
//! Authentication and session management live outside this system; the
//! identity provider hands over a user id plus role names, which are resolved
//! **once** into typed [`Role`]s here. Downstream code never re-parses role
//! strings. This crate is intentionally decoupled from HTTP and storage.

pub mod policy;
pub mod principal;
pub mod role;

pub use policy::{PolicyError, VisibilityScope, visibility};
pub use principal::Principal;
pub use role::{Role, RoleParseError};
