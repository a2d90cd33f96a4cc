use rust_decimal::Decimal;
use serde::Deserialize;

use procura_core::{ApprovalLevel, WorkflowResult};
use procura_requests::{
    Approval, Proforma, PurchaseOrder, PurchaseRequest, RequestItem, RequestUpdate,
};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ItemBody {
    pub name: String,
    pub qty: u32,
    pub unit_price: Decimal,
}

impl ItemBody {
    pub fn into_item(self) -> RequestItem {
        RequestItem {
            name: self.name,
            qty: self.qty,
            unit_price: self.unit_price,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRequestBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<ItemBody>,
    pub required_levels: Option<Vec<u32>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequestBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub items: Option<Vec<ItemBody>>,
}

impl UpdateRequestBody {
    pub fn into_update(self) -> RequestUpdate {
        RequestUpdate {
            title: self.title,
            description: self.description,
            items: self
                .items
                .map(|items| items.into_iter().map(ItemBody::into_item).collect()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DecisionBody {
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct ReceiptBody {
    pub file_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadProformaBody {
    pub file_name: String,
    /// Document text; extraction is best-effort over its lines.
    pub content: String,
}

pub fn parse_levels(raw: Option<Vec<u32>>) -> WorkflowResult<Option<Vec<ApprovalLevel>>> {
    match raw {
        None => Ok(None),
        Some(ns) => ns
            .into_iter()
            .map(ApprovalLevel::new)
            .collect::<WorkflowResult<Vec<_>>>()
            .map(Some),
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn request_to_json(req: &PurchaseRequest) -> serde_json::Value {
    serde_json::json!({
        "id": req.request_id().to_string(),
        "title": req.title(),
        "description": req.description(),
        "amount": req.amount(),
        "status": req.status().to_string(),
        "created_by": req.created_by().to_string(),
        "last_approved_by": req.last_approved_by().map(|id| id.to_string()),
        "created_at": req.created_at(),
        "updated_at": req.updated_at(),
        "proforma_id": req.proforma_id().map(|id| id.to_string()),
        "receipt": req.receipt().map(|r| serde_json::json!({
            "file_name": r.file_name,
            "uploaded_at": r.uploaded_at,
        })),
        "required_levels": req.required_levels().map(|levels| {
            levels.iter().map(|l| l.get()).collect::<Vec<_>>()
        }),
        "items": req.items().iter().map(item_to_json).collect::<Vec<_>>(),
        "approvals": req.approvals().iter().map(approval_to_json).collect::<Vec<_>>(),
    })
}

pub fn item_to_json(item: &RequestItem) -> serde_json::Value {
    serde_json::json!({
        "name": item.name,
        "qty": item.qty,
        "unit_price": item.unit_price,
        "subtotal": item.subtotal(),
    })
}

pub fn approval_to_json(approval: &Approval) -> serde_json::Value {
    serde_json::json!({
        "approver": approval.approver.to_string(),
        "level": approval.level.get(),
        "action": approval.action,
        "comment": approval.comment,
        "created_at": approval.created_at,
    })
}

pub fn proforma_to_json(proforma: &Proforma) -> serde_json::Value {
    serde_json::json!({
        "id": proforma.id.to_string(),
        "file_name": proforma.file_name,
        "vendor_name": proforma.vendor_name,
        "items": proforma.items.iter().map(item_to_json).collect::<Vec<_>>(),
        "total": proforma.total,
        "uploaded_by": proforma.uploaded_by.to_string(),
        "uploaded_at": proforma.uploaded_at,
    })
}

pub fn order_to_json(order: &PurchaseOrder) -> serde_json::Value {
    serde_json::json!({
        "id": order.id.to_string(),
        "request_id": order.request_id.to_string(),
        "proforma_id": order.proforma_id.map(|id| id.to_string()),
        "vendor_name": order.vendor_name,
        "items": order.items.iter().map(item_to_json).collect::<Vec<_>>(),
        "total": order.total,
        "generated_by": order.generated_by.map(|id| id.to_string()),
        "generated_at": order.generated_at,
        "reference": order.reference,
        "draft": order.is_draft(),
    })
}
