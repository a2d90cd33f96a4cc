//! In-memory request store for tests/dev.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

use procura_core::{
    ApprovalLevel, Entity, ProformaId, RequestId, UserId, WorkflowError, WorkflowResult,
};
use procura_requests::{Proforma, PurchaseOrder, PurchaseRequest};

use crate::store::RequestStore;

type DecisionKey = (RequestId, UserId, ApprovalLevel);

/// In-memory store.
///
/// Each request row sits behind its own mutex, which is the exclusive
/// "row lock" of the contract; lock scope never spans two requests, so
/// deadlock is impossible by construction. Mutations run on a clone of the
/// row and only replace it on success, which gives the all-or-nothing
/// semantics a transaction would.
#[derive(Debug, Default)]
pub struct InMemoryWorkflowStore {
    requests: RwLock<HashMap<RequestId, Arc<Mutex<PurchaseRequest>>>>,
    /// Mirror of the DB uniqueness index over (request, approver, level).
    decisions: Mutex<HashSet<DecisionKey>>,
    proformas: RwLock<HashMap<ProformaId, Proforma>>,
    orders: RwLock<HashMap<RequestId, PurchaseOrder>>,
}

impl InMemoryWorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RequestStore for InMemoryWorkflowStore {
    fn insert_request(&self, request: PurchaseRequest) -> WorkflowResult<()> {
        let id = *request.id();

        {
            let mut index = self.decisions.lock().unwrap_or_else(|p| p.into_inner());
            for approval in request.approvals() {
                let (approver, level) = approval.key();
                if !index.insert((id, approver, level)) {
                    return Err(WorkflowError::duplicate_action(format!(
                        "approver already acted on level {level}"
                    )));
                }
            }
        }

        let mut map = self.requests.write().unwrap_or_else(|p| p.into_inner());
        if map.contains_key(&id) {
            return Err(WorkflowError::validation(format!(
                "request {id} already exists"
            )));
        }
        map.insert(id, Arc::new(Mutex::new(request)));
        Ok(())
    }

    fn get_request(&self, id: RequestId) -> WorkflowResult<PurchaseRequest> {
        let row = {
            let map = self.requests.read().unwrap_or_else(|p| p.into_inner());
            map.get(&id).cloned()
        }
        .ok_or(WorkflowError::NotFound)?;

        let guard = row.lock().unwrap_or_else(|p| p.into_inner());
        Ok(guard.clone())
    }

    fn list_requests(&self) -> Vec<PurchaseRequest> {
        let rows: Vec<Arc<Mutex<PurchaseRequest>>> = {
            let map = self.requests.read().unwrap_or_else(|p| p.into_inner());
            map.values().cloned().collect()
        };

        rows.iter()
            .map(|row| row.lock().unwrap_or_else(|p| p.into_inner()).clone())
            .collect()
    }

    fn update_request<T, F>(&self, id: RequestId, mutate: F) -> WorkflowResult<T>
    where
        F: FnOnce(&mut PurchaseRequest) -> WorkflowResult<T>,
    {
        let row = {
            let map = self.requests.read().unwrap_or_else(|p| p.into_inner());
            map.get(&id).cloned()
        }
        .ok_or(WorkflowError::NotFound)?;

        // Exclusive row lock for the whole read-check-write sequence. A
        // poisoned lock only means a peer panicked; the row itself is intact
        // because commits below are whole-row swaps.
        let mut guard = row.lock().unwrap_or_else(|p| p.into_inner());

        let mut draft = guard.clone();
        let before: HashSet<(UserId, ApprovalLevel)> =
            guard.approvals().iter().map(|a| a.key()).collect();

        let value = mutate(&mut draft)?;

        // Uniqueness constraint on appended approvals, checked before the
        // commit becomes visible.
        let appended: Vec<(UserId, ApprovalLevel)> = draft
            .approvals()
            .iter()
            .map(|a| a.key())
            .filter(|key| !before.contains(key))
            .collect();
        if !appended.is_empty() {
            let mut index = self.decisions.lock().unwrap_or_else(|p| p.into_inner());
            for (approver, level) in &appended {
                if !index.insert((id, *approver, *level)) {
                    return Err(WorkflowError::duplicate_action(format!(
                        "approver already acted on level {level}"
                    )));
                }
            }
        }

        *guard = draft;
        Ok(value)
    }

    fn insert_proforma(&self, proforma: Proforma) -> WorkflowResult<()> {
        let mut map = self.proformas.write().unwrap_or_else(|p| p.into_inner());
        map.insert(*proforma.id(), proforma);
        Ok(())
    }

    fn get_proforma(&self, id: ProformaId) -> WorkflowResult<Proforma> {
        let map = self.proformas.read().unwrap_or_else(|p| p.into_inner());
        map.get(&id).cloned().ok_or(WorkflowError::NotFound)
    }

    fn upsert_order(&self, order: PurchaseOrder) -> WorkflowResult<()> {
        let mut map = self.orders.write().unwrap_or_else(|p| p.into_inner());
        map.insert(order.request_id, order);
        Ok(())
    }

    fn order_for_request(&self, request_id: RequestId) -> Option<PurchaseOrder> {
        let map = self.orders.read().unwrap_or_else(|p| p.into_inner());
        map.get(&request_id).cloned()
    }
}
