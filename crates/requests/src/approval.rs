use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use procura_core::{ApprovalLevel, UserId};

/// The decision an approver took.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalAction {
    Approved,
    Rejected,
}

/// One approver's decision at one ladder level for one request.
///
/// Approvals form an append-only audit trail: rows are never updated or
/// deleted, and at most one exists per (approver, level) within a request.
/// That uniqueness is checked here *and* enforced by the store's index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub approver: UserId,
    pub level: ApprovalLevel,
    pub action: ApprovalAction,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Approval {
    /// The uniqueness key within a request.
    pub fn key(&self) -> (UserId, ApprovalLevel) {
        (self.approver, self.level)
    }
}
