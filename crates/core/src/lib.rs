//! Foundation types for the purchase-request workflow.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod level;

pub use entity::Entity;
pub use error::{WorkflowError, WorkflowResult};
pub use id::{ProformaId, PurchaseOrderId, RequestId, UserId};
pub use level::ApprovalLevel;
