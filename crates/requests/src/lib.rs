//! Purchase-request domain model.
//!
//! The aggregate root is [`PurchaseRequest`], which owns its line items and
//! its append-only approval trail. The approval state machine
//! (PENDING → APPROVED | REJECTED, quorum on approve, veto on reject) lives
//! here as pure, deterministic transitions; locking and persistence are the
//! engine's concern.

pub mod approval;
pub mod event;
pub mod order;
pub mod proforma;
pub mod request;

pub use approval::{Approval, ApprovalAction};
pub use event::RequestEvent;
pub use order::PurchaseOrder;
pub use proforma::Proforma;
pub use request::{
    DecisionOutcome, DocumentRef, PurchaseRequest, RequestItem, RequestStatus, RequestUpdate,
};
