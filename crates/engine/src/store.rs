//! Persistence seam for the workflow.
//!
//! This is the contract the engine needs from whatever stores the data:
//! atomic multi-row mutations, an exclusive per-request lock, and a
//! uniqueness constraint over (request, approver, level). A SQL
//! implementation maps `update_request` onto `SELECT ... FOR UPDATE` inside
//! a transaction; the in-memory one in [`crate::memory`] uses a per-row
//! mutex with copy-on-write commit.

use procura_core::{ProformaId, RequestId, WorkflowResult};
use procura_requests::{Proforma, PurchaseOrder, PurchaseRequest};

pub trait RequestStore: Send + Sync {
    fn insert_request(&self, request: PurchaseRequest) -> WorkflowResult<()>;

    /// Snapshot of the current request state (no lock held on return).
    fn get_request(&self, id: RequestId) -> WorkflowResult<PurchaseRequest>;

    fn list_requests(&self) -> Vec<PurchaseRequest>;

    /// Run `mutate` under the request's exclusive lock and commit the result
    /// atomically.
    ///
    /// Semantics the engine relies on:
    /// - calls for the same request are fully serialized (linearized); two
    ///   concurrent callers can never both observe the pre-mutation state,
    /// - an `Err` from `mutate` rolls everything back,
    /// - on `Ok`, newly appended approvals are checked against the
    ///   (request, approver, level) uniqueness constraint before the commit
    ///   becomes visible, the second line of defense behind the lock.
    fn update_request<T, F>(&self, id: RequestId, mutate: F) -> WorkflowResult<T>
    where
        F: FnOnce(&mut PurchaseRequest) -> WorkflowResult<T>;

    fn insert_proforma(&self, proforma: Proforma) -> WorkflowResult<()>;

    fn get_proforma(&self, id: ProformaId) -> WorkflowResult<Proforma>;

    /// Insert or replace the one purchase order of a request.
    fn upsert_order(&self, order: PurchaseOrder) -> WorkflowResult<()>;

    fn order_for_request(&self, request_id: RequestId) -> Option<PurchaseOrder>;
}
