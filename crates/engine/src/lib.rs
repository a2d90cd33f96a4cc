//! Orchestration over the request store.
//!
//! [`ApprovalEngine`] drives the approval state machine under the store's
//! per-request exclusive lock; [`LifecycleManager`] handles creation,
//! editing, proforma ingestion, receipts and listings. Persistence is behind
//! the [`RequestStore`] seam; the in-memory implementation here is what
//! tests and the dev server run on, a database-backed one plugs into the
//! same trait.

pub mod approval;
pub mod config;
pub mod lifecycle;
pub mod memory;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use approval::ApprovalEngine;
pub use config::WorkflowConfig;
pub use lifecycle::{LifecycleManager, NewRequest, ProformaUpload};
pub use memory::InMemoryWorkflowStore;
pub use store::RequestStore;
