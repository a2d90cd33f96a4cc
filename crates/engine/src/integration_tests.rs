//! End-to-end tests driving the lifecycle manager and approval engine over
//! the in-memory store and bus.

use std::sync::Arc;
use std::thread;

use rust_decimal::Decimal;

use procura_auth::{Principal, Role};
use procura_core::{ApprovalLevel, UserId, WorkflowError};
use procura_events::{EventBus, InMemoryEventBus};
use procura_extract::{Document, TextExtractor};
use procura_requests::{RequestEvent, RequestItem, RequestStatus, RequestUpdate};

use crate::{
    ApprovalEngine, InMemoryWorkflowStore, LifecycleManager, NewRequest, RequestStore,
    WorkflowConfig,
};

const PROFORMA_TEXT: &str = "Vendor: Acme Supplies\nWidget 2 5.00\nBracket 1 3.00\n";

struct Harness {
    store: Arc<InMemoryWorkflowStore>,
    bus: Arc<InMemoryEventBus<RequestEvent>>,
    lifecycle:
        LifecycleManager<InMemoryWorkflowStore, InMemoryEventBus<RequestEvent>, TextExtractor>,
    engine: Arc<ApprovalEngine<InMemoryWorkflowStore, InMemoryEventBus<RequestEvent>>>,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryWorkflowStore::new());
    let bus = Arc::new(InMemoryEventBus::new());
    let config = WorkflowConfig::default();
    Harness {
        lifecycle: LifecycleManager::new(
            Arc::clone(&store),
            Arc::clone(&bus),
            Arc::new(TextExtractor::new()),
            config.clone(),
        ),
        engine: Arc::new(ApprovalEngine::new(
            Arc::clone(&store),
            Arc::clone(&bus),
            config,
        )),
        store,
        bus,
    }
}

fn staff() -> Principal {
    Principal::new(UserId::new(), vec![Role::Staff])
}

fn approver(level: u32) -> Principal {
    Principal::new(
        UserId::new(),
        vec![Role::ApproverLevel(ApprovalLevel::new(level).unwrap())],
    )
}

fn finance() -> Principal {
    Principal::new(UserId::new(), vec![Role::Finance])
}

fn items() -> Vec<RequestItem> {
    vec![
        RequestItem {
            name: "Widget".to_string(),
            qty: 2,
            unit_price: "5".parse().unwrap(),
        },
        RequestItem {
            name: "Bracket".to_string(),
            qty: 1,
            unit_price: "3".parse().unwrap(),
        },
    ]
}

fn new_request(title: &str) -> NewRequest {
    NewRequest {
        title: title.to_string(),
        description: String::new(),
        items: items(),
        required_levels: None,
    }
}

#[test]
fn create_computes_amount_and_publishes() {
    let h = harness();
    let sub = h.bus.subscribe();
    let creator = staff();

    let request = h.lifecycle.create(&creator, new_request("Office kit")).unwrap();
    assert_eq!(request.amount(), "13".parse::<Decimal>().unwrap());
    assert_eq!(request.status(), RequestStatus::Pending);

    let events = sub.drain();
    assert!(matches!(events.as_slice(), [RequestEvent::Created { .. }]));
}

#[test]
fn create_requires_staff_role() {
    let h = harness();
    let nobody = Principal::new(UserId::new(), Vec::new());
    let err = h.lifecycle.create(&nobody, new_request("x")).unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));
    assert!(h.lifecycle.list_for(&nobody).is_empty());
}

#[test]
fn proforma_flow_finalizes_the_draft_order() {
    let h = harness();
    let uploader = staff();
    let first = approver(1);
    let second = approver(2);

    let upload = h
        .lifecycle
        .upload_proforma(&uploader, Document::new("acme.txt", PROFORMA_TEXT.as_bytes().to_vec()))
        .unwrap();
    let request_id = upload.request.request_id();
    assert_eq!(upload.proforma.vendor_name.as_deref(), Some("Acme Supplies"));
    assert_eq!(upload.request.amount(), "13.00".parse::<Decimal>().unwrap());
    assert!(upload.order.is_draft());

    let mid = h.engine.approve(&first, request_id, "").unwrap();
    assert_eq!(mid.status(), RequestStatus::Pending);
    assert!(h.store.order_for_request(request_id).unwrap().is_draft());

    let sub = h.bus.subscribe();
    let done = h.engine.approve(&second, request_id, "looks good").unwrap();
    assert_eq!(done.status(), RequestStatus::Approved);
    assert_eq!(done.last_approved_by(), Some(second.user_id()));

    // Same order row, now finalized with a reference.
    let order = h.store.order_for_request(request_id).unwrap();
    assert_eq!(order.id, upload.order.id);
    assert!(!order.is_draft());
    assert_eq!(order.generated_by, Some(second.user_id()));
    assert!(
        order
            .reference
            .as_deref()
            .unwrap()
            .starts_with(&format!("PO-{request_id}-"))
    );

    let events = sub.drain();
    assert!(events.iter().any(|e| matches!(e, RequestEvent::Approved { .. })));
    assert!(events.iter().any(|e| matches!(e, RequestEvent::OrderGenerated { .. })));
}

#[test]
fn approval_without_proforma_commits_status_but_reports_missing_proforma() {
    let h = harness();
    let creator = staff();
    let request = h.lifecycle.create(&creator, new_request("No proforma")).unwrap();
    let request_id = request.request_id();

    h.engine.approve(&approver(1), request_id, "").unwrap();
    let err = h.engine.approve(&approver(2), request_id, "").unwrap_err();
    assert!(matches!(err, WorkflowError::MissingProforma(_)));

    // The transition committed before order generation failed.
    let stored = h.store.get_request(request_id).unwrap();
    assert_eq!(stored.status(), RequestStatus::Approved);
    assert_eq!(stored.approvals().len(), 2);
    assert!(h.store.order_for_request(request_id).is_none());
}

#[test]
fn rejection_is_a_veto_and_terminal() {
    let h = harness();
    let request = h.lifecycle.create(&staff(), new_request("Veto me")).unwrap();
    let request_id = request.request_id();

    let rejected = h.engine.reject(&approver(1), request_id, "over budget").unwrap();
    assert_eq!(rejected.status(), RequestStatus::Rejected);

    let err = h.engine.approve(&approver(2), request_id, "").unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidState(_)));
    assert_eq!(
        h.store.get_request(request_id).unwrap().approvals().len(),
        1
    );
}

#[test]
fn second_decision_by_same_approver_and_level_is_duplicate() {
    let h = harness();
    let request = h.lifecycle.create(&staff(), new_request("Dup")).unwrap();
    let request_id = request.request_id();
    let first = approver(1);

    h.engine.approve(&first, request_id, "").unwrap();
    let err = h.engine.reject(&first, request_id, "changed my mind").unwrap_err();
    assert!(matches!(err, WorkflowError::DuplicateAction(_)));

    let stored = h.store.get_request(request_id).unwrap();
    assert_eq!(stored.status(), RequestStatus::Pending);
    assert_eq!(stored.approvals().len(), 1);
}

#[test]
fn decisions_require_an_approver_role() {
    let h = harness();
    let request = h.lifecycle.create(&staff(), new_request("x")).unwrap();
    let err = h
        .engine
        .approve(&finance(), request.request_id(), "")
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));
}

#[test]
fn update_is_creator_only_and_pending_only() {
    let h = harness();
    let creator = staff();
    let request = h.lifecycle.create(&creator, new_request("Edit me")).unwrap();
    let request_id = request.request_id();
    let amount = request.amount();

    let update = RequestUpdate {
        title: Some("Edited".to_string()),
        description: None,
        items: Some(vec![RequestItem {
            name: "Monitor".to_string(),
            qty: 3,
            unit_price: "7".parse().unwrap(),
        }]),
    };

    let err = h
        .lifecycle
        .update(&staff(), request_id, update.clone())
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));

    let edited = h.lifecycle.update(&creator, request_id, update).unwrap();
    assert_eq!(edited.title(), "Edited");
    assert_eq!(edited.items().len(), 1);
    // Amount stays as computed at creation.
    assert_eq!(edited.amount(), amount);

    h.engine.reject(&approver(1), request_id, "").unwrap();
    let err = h
        .lifecycle
        .update(&creator, request_id, RequestUpdate::default())
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidState(_)));
}

#[test]
fn receipts_come_from_creator_or_finance_in_any_status() {
    let h = harness();
    let creator = staff();
    let request = h.lifecycle.create(&creator, new_request("Receipts")).unwrap();
    let request_id = request.request_id();
    h.engine.reject(&approver(1), request_id, "").unwrap();

    let err = h
        .lifecycle
        .submit_receipt(&staff(), request_id, "r.pdf".to_string())
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));

    // Creator may attach even after rejection; finance may overwrite.
    let with_receipt = h
        .lifecycle
        .submit_receipt(&creator, request_id, "r.pdf".to_string())
        .unwrap();
    assert_eq!(with_receipt.receipt().unwrap().file_name, "r.pdf");

    let replaced = h
        .lifecycle
        .submit_receipt(&finance(), request_id, "final.pdf".to_string())
        .unwrap();
    assert_eq!(replaced.receipt().unwrap().file_name, "final.pdf");
}

#[test]
fn listing_respects_visibility_scopes() {
    let h = harness();
    let alice = staff();
    let bob = staff();
    h.lifecycle.create(&alice, new_request("Alice's")).unwrap();
    h.lifecycle.create(&bob, new_request("Bob's")).unwrap();

    let own = h.lifecycle.list_for(&alice);
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].title(), "Alice's");

    assert_eq!(h.lifecycle.list_for(&approver(1)).len(), 2);
    assert_eq!(h.lifecycle.list_for(&finance()).len(), 2);

    // Out-of-scope single reads are NotFound, not Forbidden.
    let bobs_id = h.lifecycle.list_for(&bob)[0].request_id();
    assert_eq!(
        h.lifecycle.get(&alice, bobs_id).unwrap_err(),
        WorkflowError::NotFound
    );
}

#[test]
fn pending_queue_filters_by_ladder_level() {
    let h = harness();
    let creator = staff();
    h.lifecycle.create(&creator, new_request("Default ladder")).unwrap();

    let mut narrow = new_request("Level 2 only");
    narrow.required_levels = Some(vec![ApprovalLevel::new(2).unwrap()]);
    h.lifecycle.create(&creator, narrow).unwrap();

    // Level 1 sits on the default ladder only; level 2 on both.
    let first = approver(1);
    let second = approver(2);
    assert_eq!(h.lifecycle.list_pending(&first).unwrap().len(), 1);
    assert_eq!(h.lifecycle.list_pending(&second).unwrap().len(), 2);

    let err = h.lifecycle.list_pending(&creator).unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));
}

#[test]
fn reviewed_and_finance_queues_see_terminal_requests() {
    let h = harness();
    let creator = staff();
    let first = approver(1);
    let second = approver(2);

    let upload = h
        .lifecycle
        .upload_proforma(&creator, Document::new("a.txt", PROFORMA_TEXT.as_bytes().to_vec()))
        .unwrap();
    h.engine.approve(&first, upload.request.request_id(), "").unwrap();
    h.engine.approve(&second, upload.request.request_id(), "").unwrap();

    let vetoed = h.lifecycle.create(&creator, new_request("Vetoed")).unwrap();
    h.engine.reject(&first, vetoed.request_id(), "").unwrap();

    h.lifecycle.create(&creator, new_request("Still open")).unwrap();

    assert_eq!(h.lifecycle.list_reviewed(&first).unwrap().len(), 2);

    let financed = h.lifecycle.finance_list(&finance()).unwrap();
    assert_eq!(financed.len(), 1);
    assert_eq!(financed[0].status(), RequestStatus::Approved);

    assert!(h.lifecycle.finance_list(&creator).is_err());
}

#[test]
fn concurrent_approvals_complete_the_quorum_exactly_once() {
    let h = harness();
    let upload = h
        .lifecycle
        .upload_proforma(&staff(), Document::new("a.txt", PROFORMA_TEXT.as_bytes().to_vec()))
        .unwrap();
    let request_id = upload.request.request_id();
    let sub = h.bus.subscribe();

    let handles: Vec<_> = [approver(1), approver(2)]
        .into_iter()
        .map(|principal| {
            let engine = Arc::clone(&h.engine);
            thread::spawn(move || engine.approve(&principal, request_id, ""))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let stored = h.store.get_request(request_id).unwrap();
    assert_eq!(stored.status(), RequestStatus::Approved);
    assert_eq!(stored.approvals().len(), 2);
    assert!(!h.store.order_for_request(request_id).unwrap().is_draft());

    let approved_events = sub
        .drain()
        .into_iter()
        .filter(|e| matches!(e, RequestEvent::Approved { .. }))
        .count();
    assert_eq!(approved_events, 1);
}

#[test]
fn concurrent_duplicate_decisions_leave_one_row() {
    let h = harness();
    let request = h.lifecycle.create(&staff(), new_request("Race")).unwrap();
    let request_id = request.request_id();
    let principal = approver(1);

    let results: Vec<_> = (0..2)
        .map(|_| {
            let engine = Arc::clone(&h.engine);
            let principal = principal.clone();
            thread::spawn(move || engine.approve(&principal, request_id, ""))
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().any(|r| matches!(
        r,
        Err(WorkflowError::DuplicateAction(_))
    )));
    assert_eq!(
        h.store.get_request(request_id).unwrap().approvals().len(),
        1
    );
}
