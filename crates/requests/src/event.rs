use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use procura_core::{ApprovalLevel, ProformaId, PurchaseOrderId, RequestId, UserId};
use procura_events::Event;

use crate::approval::ApprovalAction;

/// Workflow notifications published after a mutation commits.
///
/// The store is the source of truth; these are for audit trails, dashboards
/// and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestEvent {
    Created {
        request_id: RequestId,
        created_by: UserId,
        amount: Decimal,
        occurred_at: DateTime<Utc>,
    },
    DecisionRecorded {
        request_id: RequestId,
        approver: UserId,
        level: ApprovalLevel,
        action: ApprovalAction,
        occurred_at: DateTime<Utc>,
    },
    Approved {
        request_id: RequestId,
        occurred_at: DateTime<Utc>,
    },
    Rejected {
        request_id: RequestId,
        occurred_at: DateTime<Utc>,
    },
    OrderGenerated {
        request_id: RequestId,
        order_id: PurchaseOrderId,
        reference: Option<String>,
        occurred_at: DateTime<Utc>,
    },
    ProformaUploaded {
        proforma_id: ProformaId,
        request_id: RequestId,
        occurred_at: DateTime<Utc>,
    },
    ReceiptSubmitted {
        request_id: RequestId,
        occurred_at: DateTime<Utc>,
    },
}

impl Event for RequestEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RequestEvent::Created { .. } => "requests.request.created",
            RequestEvent::DecisionRecorded { .. } => "requests.request.decision_recorded",
            RequestEvent::Approved { .. } => "requests.request.approved",
            RequestEvent::Rejected { .. } => "requests.request.rejected",
            RequestEvent::OrderGenerated { .. } => "requests.order.generated",
            RequestEvent::ProformaUploaded { .. } => "requests.proforma.uploaded",
            RequestEvent::ReceiptSubmitted { .. } => "requests.request.receipt_submitted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RequestEvent::Created { occurred_at, .. }
            | RequestEvent::DecisionRecorded { occurred_at, .. }
            | RequestEvent::Approved { occurred_at, .. }
            | RequestEvent::Rejected { occurred_at, .. }
            | RequestEvent::OrderGenerated { occurred_at, .. }
            | RequestEvent::ProformaUploaded { occurred_at, .. }
            | RequestEvent::ReceiptSubmitted { occurred_at, .. } => *occurred_at,
        }
    }
}
