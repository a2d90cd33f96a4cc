//! Access policy: who may see and mutate which requests.
//!
//! Pure policy checks, no IO and no business logic. Engine operations call
//! these before (or inside) their locked mutation.

use thiserror::Error;

use procura_core::{ApprovalLevel, UserId, WorkflowError};

use crate::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("forbidden: {0}")]
    Forbidden(String),
}

impl From<PolicyError> for WorkflowError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::Forbidden(msg) => WorkflowError::Forbidden(msg),
        }
    }
}

/// How much of the request list a principal may see.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VisibilityScope {
    /// Only requests the principal created (staff).
    Own,
    /// Every request (approvers and finance).
    All,
    /// Nothing: a user with no recognized role gets an empty result set,
    /// never an error.
    Nothing,
}

pub fn visibility(principal: &Principal) -> VisibilityScope {
    if principal.is_approver() || principal.is_finance() {
        VisibilityScope::All
    } else if principal.is_staff() {
        VisibilityScope::Own
    } else {
        VisibilityScope::Nothing
    }
}

pub fn can_view(principal: &Principal, created_by: UserId) -> bool {
    match visibility(principal) {
        VisibilityScope::All => true,
        VisibilityScope::Own => principal.user_id() == created_by,
        VisibilityScope::Nothing => false,
    }
}

pub fn require_staff(principal: &Principal) -> Result<(), PolicyError> {
    if principal.is_staff() {
        Ok(())
    } else {
        Err(PolicyError::Forbidden(
            "only staff may create requests".to_string(),
        ))
    }
}

pub fn require_finance(principal: &Principal) -> Result<(), PolicyError> {
    if principal.is_finance() {
        Ok(())
    } else {
        Err(PolicyError::Forbidden(
            "finance role required".to_string(),
        ))
    }
}

/// Approve/reject require an approver role; the ladder level is carried by
/// the role itself.
pub fn require_approver(principal: &Principal) -> Result<ApprovalLevel, PolicyError> {
    principal.approver_level().ok_or_else(|| {
        PolicyError::Forbidden("approver level not found on user".to_string())
    })
}

/// Editing a request is reserved to its creator.
pub fn require_creator(principal: &Principal, created_by: UserId) -> Result<(), PolicyError> {
    if principal.user_id() == created_by {
        Ok(())
    } else {
        Err(PolicyError::Forbidden(
            "only the request creator may edit it".to_string(),
        ))
    }
}

/// Receipts come from the creator, or from finance on the creator's behalf.
pub fn require_receipt_submitter(
    principal: &Principal,
    created_by: UserId,
) -> Result<(), PolicyError> {
    if principal.user_id() == created_by || principal.is_finance() {
        Ok(())
    } else {
        Err(PolicyError::Forbidden(
            "only the request creator or finance may submit a receipt".to_string(),
        ))
    }
}
