use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use procura_core::{Entity, ProformaId, UserId};

use crate::request::RequestItem;

/// An uploaded vendor proforma plus whatever the extractor recovered from it.
///
/// Immutable after creation: the extraction fields are set exactly once when
/// the document is ingested. Extraction output is best-effort and
/// unvalidated; `None`/empty fields mean nothing was recovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proforma {
    pub id: ProformaId,
    pub file_name: String,
    pub vendor_name: Option<String>,
    pub items: Vec<RequestItem>,
    pub total: Option<Decimal>,
    pub uploaded_by: UserId,
    pub uploaded_at: DateTime<Utc>,
}

impl Entity for Proforma {
    type Id = ProformaId;

    fn id(&self) -> &ProformaId {
        &self.id
    }
}
