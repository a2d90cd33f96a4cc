use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use procura_core::{Entity, ProformaId, PurchaseOrderId, RequestId, UserId};

use crate::proforma::Proforma;
use crate::request::RequestItem;

/// The procurement document produced from a request.
///
/// One per request. A *draft* (no reference) is created synchronously when a
/// proforma is uploaded; the order is finalized (reference assigned,
/// generator recorded) when the request completes its approval quorum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: PurchaseOrderId,
    pub request_id: RequestId,
    pub proforma_id: Option<ProformaId>,
    pub vendor_name: String,
    pub items: Vec<RequestItem>,
    pub total: Decimal,
    pub generated_by: Option<UserId>,
    pub generated_at: DateTime<Utc>,
    pub reference: Option<String>,
}

impl PurchaseOrder {
    /// Draft order snapshotting the proforma extraction at upload time.
    pub fn draft(
        id: PurchaseOrderId,
        request_id: RequestId,
        proforma: &Proforma,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            request_id,
            proforma_id: Some(proforma.id),
            vendor_name: proforma.vendor_name.clone().unwrap_or_default(),
            items: proforma.items.clone(),
            total: proforma.total.unwrap_or_default(),
            generated_by: None,
            generated_at: now,
            reference: None,
        }
    }

    /// Finalized order generated directly on approval (no draft existed).
    pub fn generated(
        id: PurchaseOrderId,
        request_id: RequestId,
        proforma: &Proforma,
        generated_by: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        let mut order = Self::draft(id, request_id, proforma, now);
        order.finalize(generated_by, now);
        order
    }

    /// Assign the reference and the generator identity.
    pub fn finalize(&mut self, generated_by: UserId, now: DateTime<Utc>) {
        self.generated_by = Some(generated_by);
        self.generated_at = now;
        self.reference = Some(Self::reference_for(self.request_id, now));
    }

    pub fn is_draft(&self) -> bool {
        self.reference.is_none()
    }

    /// Unique order reference, `PO-<request id>-<unix timestamp>`.
    pub fn reference_for(request_id: RequestId, now: DateTime<Utc>) -> String {
        format!("PO-{}-{}", request_id, now.timestamp())
    }
}

impl Entity for PurchaseOrder {
    type Id = PurchaseOrderId;

    fn id(&self) -> &PurchaseOrderId {
        &self.id
    }
}
