//! The approval engine: approve/reject under the row lock, purchase-order
//! finalization on quorum.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use procura_auth::{Principal, policy};
use procura_core::{PurchaseOrderId, RequestId, WorkflowError, WorkflowResult};
use procura_events::{Event, EventBus};
use procura_requests::{
    ApprovalAction, DecisionOutcome, PurchaseOrder, PurchaseRequest, RequestEvent,
};

use crate::config::WorkflowConfig;
use crate::store::RequestStore;

pub struct ApprovalEngine<S, B> {
    store: Arc<S>,
    bus: Arc<B>,
    config: WorkflowConfig,
}

impl<S, B> ApprovalEngine<S, B>
where
    S: RequestStore,
    B: EventBus<RequestEvent>,
{
    pub fn new(store: Arc<S>, bus: Arc<B>, config: WorkflowConfig) -> Self {
        Self { store, bus, config }
    }

    /// Record an approval at the caller's ladder level.
    ///
    /// When this completes the quorum the request transitions to APPROVED
    /// and its purchase order is finalized from the linked proforma. The
    /// transition commits before order generation runs, so a missing
    /// proforma surfaces as [`WorkflowError::MissingProforma`] while the
    /// APPROVED status stands (see DESIGN.md).
    pub fn approve(
        &self,
        principal: &Principal,
        request_id: RequestId,
        comment: impl Into<String>,
    ) -> WorkflowResult<PurchaseRequest> {
        self.decide(principal, request_id, ApprovalAction::Approved, comment.into())
    }

    /// Record a rejection at the caller's ladder level. One rejection is a
    /// veto: the request is REJECTED immediately and finally.
    pub fn reject(
        &self,
        principal: &Principal,
        request_id: RequestId,
        comment: impl Into<String>,
    ) -> WorkflowResult<PurchaseRequest> {
        self.decide(principal, request_id, ApprovalAction::Rejected, comment.into())
    }

    fn decide(
        &self,
        principal: &Principal,
        request_id: RequestId,
        action: ApprovalAction,
        comment: String,
    ) -> WorkflowResult<PurchaseRequest> {
        let level = policy::require_approver(principal)?;
        let approver = principal.user_id();
        let now = Utc::now();

        let (outcome, request) = self.store.update_request(request_id, |req| {
            let required: Vec<_> = req
                .required_levels()
                .unwrap_or(self.config.default_levels())
                .to_vec();
            let outcome = req.record_decision(approver, level, action, comment, &required, now)?;
            Ok((outcome, req.clone()))
        })?;

        match outcome {
            DecisionOutcome::RepairedRejection => {
                tracing::warn!(
                    request_id = %request_id,
                    "late approval found a committed rejection; status repaired to REJECTED"
                );
                Err(WorkflowError::AlreadyRejected)
            }
            DecisionOutcome::StillPending => {
                self.publish_decision(&request, approver, level, action, now);
                Ok(request)
            }
            DecisionOutcome::Rejected => {
                self.publish_decision(&request, approver, level, action, now);
                tracing::info!(request_id = %request_id, level = %level, "request rejected");
                self.publish(RequestEvent::Rejected {
                    request_id,
                    occurred_at: now,
                });
                Ok(request)
            }
            DecisionOutcome::Approved => {
                self.publish_decision(&request, approver, level, action, now);
                tracing::info!(request_id = %request_id, level = %level, "approval quorum complete");
                self.publish(RequestEvent::Approved {
                    request_id,
                    occurred_at: now,
                });
                self.finalize_order(principal, &request, now)?;
                Ok(request)
            }
        }
    }

    /// Generate (or finalize the draft of) the request's purchase order.
    fn finalize_order(
        &self,
        principal: &Principal,
        request: &PurchaseRequest,
        now: DateTime<Utc>,
    ) -> WorkflowResult<()> {
        let request_id = request.request_id();

        let Some(proforma_id) = request.proforma_id() else {
            // Known gap, preserved deliberately: the APPROVED status and the
            // approval row have already committed.
            tracing::warn!(
                request_id = %request_id,
                "request approved without a linked proforma; purchase order not generated"
            );
            return Err(WorkflowError::missing_proforma(format!(
                "request {request_id} has no linked proforma"
            )));
        };

        let proforma = self.store.get_proforma(proforma_id).map_err(|_| {
            tracing::warn!(
                request_id = %request_id,
                proforma_id = %proforma_id,
                "linked proforma is gone; purchase order not generated"
            );
            WorkflowError::missing_proforma(format!("proforma {proforma_id} is not stored"))
        })?;

        let order = match self.store.order_for_request(request_id) {
            Some(mut draft) => {
                draft.finalize(principal.user_id(), now);
                draft
            }
            None => PurchaseOrder::generated(
                PurchaseOrderId::new(),
                request_id,
                &proforma,
                principal.user_id(),
                now,
            ),
        };

        self.publish(RequestEvent::OrderGenerated {
            request_id,
            order_id: order.id,
            reference: order.reference.clone(),
            occurred_at: now,
        });
        self.store.upsert_order(order)
    }

    fn publish_decision(
        &self,
        request: &PurchaseRequest,
        approver: procura_core::UserId,
        level: procura_core::ApprovalLevel,
        action: ApprovalAction,
        now: DateTime<Utc>,
    ) {
        self.publish(RequestEvent::DecisionRecorded {
            request_id: request.request_id(),
            approver,
            level,
            action,
            occurred_at: now,
        });
    }

    fn publish(&self, event: RequestEvent) {
        if let Err(e) = self.bus.publish(event.clone()) {
            tracing::warn!(event_type = event.event_type(), error = ?e, "event publish failed");
        }
    }
}
