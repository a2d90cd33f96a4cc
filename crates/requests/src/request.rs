use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use procura_core::{ApprovalLevel, Entity, ProformaId, RequestId, UserId, WorkflowError, WorkflowResult};

use crate::approval::{Approval, ApprovalAction};

/// Purchase request lifecycle. Both terminal states are final: no transition
/// ever leaves APPROVED or REJECTED.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl core::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RequestStatus::Pending => f.write_str("PENDING"),
            RequestStatus::Approved => f.write_str("APPROVED"),
            RequestStatus::Rejected => f.write_str("REJECTED"),
        }
    }
}

/// A line item owned by a request (deleted with it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestItem {
    pub name: String,
    pub qty: u32,
    pub unit_price: Decimal,
}

impl RequestItem {
    pub fn subtotal(&self) -> Decimal {
        Decimal::from(self.qty) * self.unit_price
    }
}

/// Reference to an externally stored document (the file itself lives in the
/// file-storage collaborator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
}

/// What a recorded decision did to the request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// Approval recorded, quorum not yet complete.
    StillPending,
    /// Approval recorded and the quorum completed: status is now APPROVED.
    Approved,
    /// Rejection recorded: status is now REJECTED (veto).
    Rejected,
    /// A rejection row from a concurrent peer was found while the status
    /// still read PENDING; the status has been forced to REJECTED and **no
    /// new row was recorded**. Callers surface this as `AlreadyRejected`
    /// after committing the repair.
    RepairedRejection,
}

/// Pending-only edit. Supplied items fully replace the existing set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub items: Option<Vec<RequestItem>>,
}

/// Aggregate root: a purchase request with its items and approval trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    id: RequestId,
    title: String,
    description: String,
    amount: Decimal,
    status: RequestStatus,
    created_by: UserId,
    last_approved_by: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    proforma_id: Option<ProformaId>,
    receipt: Option<DocumentRef>,
    /// Per-request approval ladder; `None` falls back to the configured
    /// default.
    required_levels: Option<Vec<ApprovalLevel>>,
    items: Vec<RequestItem>,
    approvals: Vec<Approval>,
}

impl PurchaseRequest {
    /// Create a request from staff-entered items.
    ///
    /// The amount is computed here from the item subtotals; any client-sent
    /// amount is ignored. It is not recomputed later.
    pub fn create(
        id: RequestId,
        created_by: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
        items: Vec<RequestItem>,
        required_levels: Option<Vec<ApprovalLevel>>,
        now: DateTime<Utc>,
    ) -> WorkflowResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(WorkflowError::validation("title must not be empty"));
        }
        if let Some(levels) = &required_levels {
            if levels.is_empty() {
                return Err(WorkflowError::validation(
                    "required approval levels must not be empty",
                ));
            }
        }

        let amount = items.iter().map(RequestItem::subtotal).sum();

        Ok(Self {
            id,
            title,
            description: description.into(),
            amount,
            status: RequestStatus::Pending,
            created_by,
            last_approved_by: None,
            created_at: now,
            updated_at: now,
            proforma_id: None,
            receipt: None,
            required_levels,
            items,
            approvals: Vec::new(),
        })
    }

    /// Create a request seeded from an uploaded proforma.
    ///
    /// This path bypasses item entry: the extracted total is trusted as-is
    /// and the item list starts empty.
    pub fn from_proforma(
        id: RequestId,
        created_by: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
        amount: Decimal,
        proforma_id: ProformaId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            amount,
            status: RequestStatus::Pending,
            created_by,
            last_approved_by: None,
            created_at: now,
            updated_at: now,
            proforma_id: Some(proforma_id),
            receipt: None,
            required_levels: None,
            items: Vec::new(),
            approvals: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn created_by(&self) -> UserId {
        self.created_by
    }

    pub fn last_approved_by(&self) -> Option<UserId> {
        self.last_approved_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn proforma_id(&self) -> Option<ProformaId> {
        self.proforma_id
    }

    pub fn receipt(&self) -> Option<&DocumentRef> {
        self.receipt.as_ref()
    }

    pub fn required_levels(&self) -> Option<&[ApprovalLevel]> {
        self.required_levels.as_deref()
    }

    pub fn items(&self) -> &[RequestItem] {
        &self.items
    }

    pub fn approvals(&self) -> &[Approval] {
        &self.approvals
    }

    pub fn is_editable(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Distinct levels that have at least one APPROVED row.
    pub fn approved_levels(&self) -> BTreeSet<ApprovalLevel> {
        self.approvals
            .iter()
            .filter(|a| a.action == ApprovalAction::Approved)
            .map(|a| a.level)
            .collect()
    }

    pub fn has_rejection(&self) -> bool {
        self.approvals
            .iter()
            .any(|a| a.action == ApprovalAction::Rejected)
    }

    pub fn decision_for(&self, approver: UserId, level: ApprovalLevel) -> Option<&Approval> {
        self.approvals
            .iter()
            .find(|a| a.approver == approver && a.level == level)
    }

    /// Record an approve/reject decision and transition the status.
    ///
    /// Pure and deterministic; the caller runs this inside the store's
    /// exclusive per-request lock so concurrent decisions are linearized.
    ///
    /// - rejection is a veto: one REJECTED row finalizes the request,
    /// - approval needs a quorum: every level in `required` must hold an
    ///   APPROVED row before the status moves,
    /// - a second decision by the same (approver, level) is a
    ///   `DuplicateAction`,
    /// - a rejection row observed while the status still reads PENDING
    ///   (committed by a concurrent peer) forces the status to REJECTED and
    ///   returns [`DecisionOutcome::RepairedRejection`]; the repair must be
    ///   committed even though the caller reports an error.
    pub fn record_decision(
        &mut self,
        approver: UserId,
        level: ApprovalLevel,
        action: ApprovalAction,
        comment: String,
        required: &[ApprovalLevel],
        now: DateTime<Utc>,
    ) -> WorkflowResult<DecisionOutcome> {
        if self.status.is_terminal() {
            return Err(WorkflowError::invalid_state(format!(
                "cannot act on a {} request",
                self.status
            )));
        }

        if self.has_rejection() {
            self.status = RequestStatus::Rejected;
            self.updated_at = now;
            return Ok(DecisionOutcome::RepairedRejection);
        }

        if self.decision_for(approver, level).is_some() {
            return Err(WorkflowError::duplicate_action(format!(
                "approver already acted on level {level}"
            )));
        }

        self.approvals.push(Approval {
            approver,
            level,
            action,
            comment,
            created_at: now,
        });
        self.updated_at = now;

        match action {
            ApprovalAction::Rejected => {
                self.status = RequestStatus::Rejected;
                Ok(DecisionOutcome::Rejected)
            }
            ApprovalAction::Approved => {
                self.last_approved_by = Some(approver);
                let approved = self.approved_levels();
                if required.iter().all(|lvl| approved.contains(lvl)) {
                    self.status = RequestStatus::Approved;
                    Ok(DecisionOutcome::Approved)
                } else {
                    Ok(DecisionOutcome::StillPending)
                }
            }
        }
    }

    /// Apply a pending-only edit. Checked here, inside the same locked
    /// mutation that commits it, so there is no read-then-act gap.
    pub fn apply_update(&mut self, update: RequestUpdate, now: DateTime<Utc>) -> WorkflowResult<()> {
        if !self.is_editable() {
            return Err(WorkflowError::invalid_state(format!(
                "cannot update a request with status {}; only PENDING requests are editable",
                self.status
            )));
        }

        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(WorkflowError::validation("title must not be empty"));
            }
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(items) = update.items {
            // Full replacement, never a merge. The amount stays as computed
            // at creation time.
            self.items = items;
        }

        self.updated_at = now;
        Ok(())
    }

    /// Attach a receipt document. Deliberately has no status precondition.
    pub fn attach_receipt(&mut self, file_name: String, now: DateTime<Utc>) {
        self.receipt = Some(DocumentRef {
            file_name,
            uploaded_at: now,
        });
        self.updated_at = now;
    }
}

impl Entity for PurchaseRequest {
    type Id = RequestId;

    fn id(&self) -> &RequestId {
        &self.id
    }
}

impl PurchaseRequest {
    pub fn request_id(&self) -> RequestId {
        self.id
    }
}
