//! Request lifecycle: creation, editing, proforma ingestion, receipts,
//! listings.

use std::sync::Arc;

use chrono::Utc;

use procura_auth::{Principal, VisibilityScope, policy};
use procura_core::{
    ApprovalLevel, ProformaId, PurchaseOrderId, RequestId, WorkflowResult,
};
use procura_events::{Event, EventBus};
use procura_extract::{Document, DocumentExtractor};
use procura_requests::{
    Proforma, PurchaseOrder, PurchaseRequest, RequestEvent, RequestItem, RequestStatus,
    RequestUpdate,
};

use crate::config::WorkflowConfig;
use crate::store::RequestStore;

/// Payload for creating a request from staff-entered items.
///
/// Any client-supplied amount is ignored by design; the server computes it
/// from the items.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub title: String,
    pub description: String,
    pub items: Vec<RequestItem>,
    /// Per-request approval ladder; `None` uses the configured default.
    pub required_levels: Option<Vec<ApprovalLevel>>,
}

/// Everything the proforma-upload path produces in one go.
#[derive(Debug, Clone)]
pub struct ProformaUpload {
    pub proforma: Proforma,
    pub request: PurchaseRequest,
    pub order: PurchaseOrder,
}

pub struct LifecycleManager<S, B, X> {
    store: Arc<S>,
    bus: Arc<B>,
    extractor: Arc<X>,
    config: WorkflowConfig,
}

impl<S, B, X> LifecycleManager<S, B, X>
where
    S: RequestStore,
    B: EventBus<RequestEvent>,
    X: DocumentExtractor,
{
    pub fn new(store: Arc<S>, bus: Arc<B>, extractor: Arc<X>, config: WorkflowConfig) -> Self {
        Self {
            store,
            bus,
            extractor,
            config,
        }
    }

    /// Create a PENDING request; staff only.
    pub fn create(
        &self,
        principal: &Principal,
        new_request: NewRequest,
    ) -> WorkflowResult<PurchaseRequest> {
        policy::require_staff(principal)?;

        let now = Utc::now();
        let request = PurchaseRequest::create(
            RequestId::new(),
            principal.user_id(),
            new_request.title,
            new_request.description,
            new_request.items,
            new_request.required_levels,
            now,
        )?;

        self.store.insert_request(request.clone())?;
        tracing::info!(request_id = %request.request_id(), amount = %request.amount(), "request created");
        self.publish(RequestEvent::Created {
            request_id: request.request_id(),
            created_by: request.created_by(),
            amount: request.amount(),
            occurred_at: now,
        });
        Ok(request)
    }

    /// Edit a PENDING request; creator only. Ownership and status are both
    /// checked inside the locked mutation, so there is no window between
    /// the status read and the write.
    pub fn update(
        &self,
        principal: &Principal,
        request_id: RequestId,
        update: RequestUpdate,
    ) -> WorkflowResult<PurchaseRequest> {
        let now = Utc::now();
        self.store.update_request(request_id, |req| {
            policy::require_creator(principal, req.created_by())?;
            req.apply_update(update, now)?;
            Ok(req.clone())
        })
    }

    /// Ingest a vendor proforma: persist it with best-effort extraction
    /// output, then synchronously seed a PENDING request and a draft
    /// purchase order from it. The extracted total is trusted as-is.
    pub fn upload_proforma(
        &self,
        principal: &Principal,
        document: Document,
    ) -> WorkflowResult<ProformaUpload> {
        let now = Utc::now();
        let extraction = self.extractor.extract(&document);
        if extraction.is_empty() {
            tracing::warn!(file_name = %document.file_name, "extraction recovered nothing from proforma");
        }

        let proforma = Proforma {
            id: ProformaId::new(),
            file_name: document.file_name.clone(),
            vendor_name: extraction.vendor,
            items: extraction
                .items
                .into_iter()
                .map(|item| RequestItem {
                    name: item.name,
                    qty: item.qty,
                    unit_price: item.unit_price,
                })
                .collect(),
            total: Some(extraction.total),
            uploaded_by: principal.user_id(),
            uploaded_at: now,
        };

        let request = PurchaseRequest::from_proforma(
            RequestId::new(),
            principal.user_id(),
            format!("Request from {}", principal.user_id()),
            format!("Generated from proforma {}", document.file_name),
            extraction.total,
            proforma.id,
            now,
        );

        let order = PurchaseOrder::draft(
            PurchaseOrderId::new(),
            request.request_id(),
            &proforma,
            now,
        );

        self.store.insert_proforma(proforma.clone())?;
        self.store.insert_request(request.clone())?;
        self.store.upsert_order(order.clone())?;

        tracing::info!(
            proforma_id = %proforma.id,
            request_id = %request.request_id(),
            "proforma ingested"
        );
        self.publish(RequestEvent::ProformaUploaded {
            proforma_id: proforma.id,
            request_id: request.request_id(),
            occurred_at: now,
        });

        Ok(ProformaUpload {
            proforma,
            request,
            order,
        })
    }

    /// Attach a receipt; creator or finance. There is deliberately no
    /// status precondition (allowed even on REJECTED requests).
    pub fn submit_receipt(
        &self,
        principal: &Principal,
        request_id: RequestId,
        file_name: String,
    ) -> WorkflowResult<PurchaseRequest> {
        let now = Utc::now();
        let request = self.store.update_request(request_id, |req| {
            policy::require_receipt_submitter(principal, req.created_by())?;
            req.attach_receipt(file_name, now);
            Ok(req.clone())
        })?;

        self.publish(RequestEvent::ReceiptSubmitted {
            request_id,
            occurred_at: now,
        });
        Ok(request)
    }

    /// A single request, subject to the caller's visibility scope.
    /// Out-of-scope requests read as absent, not as forbidden.
    pub fn get(&self, principal: &Principal, request_id: RequestId) -> WorkflowResult<PurchaseRequest> {
        let request = self.store.get_request(request_id)?;
        if policy::can_view(principal, request.created_by()) {
            Ok(request)
        } else {
            Err(procura_core::WorkflowError::NotFound)
        }
    }

    /// Every request the caller may see. A user with no recognized role
    /// gets an empty list, never an error.
    pub fn list_for(&self, principal: &Principal) -> Vec<PurchaseRequest> {
        match policy::visibility(principal) {
            VisibilityScope::Nothing => Vec::new(),
            VisibilityScope::Own => self
                .store
                .list_requests()
                .into_iter()
                .filter(|req| req.created_by() == principal.user_id())
                .collect(),
            VisibilityScope::All => self.store.list_requests(),
        }
    }

    /// PENDING requests whose effective ladder includes the caller's own
    /// approval level.
    pub fn list_pending(&self, principal: &Principal) -> WorkflowResult<Vec<PurchaseRequest>> {
        let level = policy::require_approver(principal)?;
        Ok(self
            .store
            .list_requests()
            .into_iter()
            .filter(|req| req.status() == RequestStatus::Pending)
            .filter(|req| {
                req.required_levels()
                    .unwrap_or(self.config.default_levels())
                    .contains(&level)
            })
            .collect())
    }

    /// Requests that reached a terminal state; approvers only.
    pub fn list_reviewed(&self, principal: &Principal) -> WorkflowResult<Vec<PurchaseRequest>> {
        policy::require_approver(principal)?;
        Ok(self
            .store
            .list_requests()
            .into_iter()
            .filter(|req| req.status().is_terminal())
            .collect())
    }

    /// Finance view: APPROVED requests only.
    pub fn finance_list(&self, principal: &Principal) -> WorkflowResult<Vec<PurchaseRequest>> {
        policy::require_finance(principal)?;
        Ok(self
            .store
            .list_requests()
            .into_iter()
            .filter(|req| req.status() == RequestStatus::Approved)
            .collect())
    }

    /// The purchase order generated for a request, if any.
    pub fn order_for(
        &self,
        principal: &Principal,
        request_id: RequestId,
    ) -> WorkflowResult<Option<PurchaseOrder>> {
        // Visibility follows the request itself.
        self.get(principal, request_id)?;
        Ok(self.store.order_for_request(request_id))
    }

    fn publish(&self, event: RequestEvent) {
        if let Err(e) = self.bus.publish(event.clone()) {
            tracing::warn!(event_type = event.event_type(), error = ?e, "event publish failed");
        }
    }
}
