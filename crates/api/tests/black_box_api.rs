//! Black-box HTTP tests: build the router in process and drive it with
//! `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use procura_api::app::build_app;
use procura_core::UserId;
use procura_engine::WorkflowConfig;

fn app() -> Router {
    build_app(WorkflowConfig::default())
}

fn user() -> String {
    UserId::new().to_string()
}

fn request(method: &str, uri: &str, user_id: &str, roles: &str, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-user-id", user_id)
        .header("x-roles", roles);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn create_body() -> Value {
    json!({
        "title": "Office kit",
        "items": [
            { "name": "Widget", "qty": 2, "unit_price": "5.00" },
            { "name": "Bracket", "qty": 1, "unit_price": "3.00" }
        ]
    })
}

#[tokio::test]
async fn health_needs_no_identity() {
    let app = app();
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_a_user_id() {
    let app = app();
    let response = app
        .clone()
        .oneshot(Request::get("/requests").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::get("/requests")
                .header("x-user-id", "not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_reflects_the_resolved_principal() {
    let app = app();
    let alice = user();
    let (status, body) = send(
        &app,
        request("GET", "/me", &alice, "staff,approver-level-1", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], alice);
    assert_eq!(body["roles"], json!(["staff", "approver-level-1"]));
}

#[tokio::test]
async fn staff_creates_and_lists_own_requests() {
    let app = app();
    let alice = user();
    let bob = user();

    let (status, created) = send(
        &app,
        request("POST", "/requests", &alice, "staff", Some(create_body())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "PENDING");
    assert_eq!(created["amount"], "13.00");

    // Creation without the staff role is forbidden.
    let (status, body) = send(
        &app,
        request("POST", "/requests", &bob, "finance", Some(create_body())),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    // Other staff see an empty list and a 404 on direct reads.
    let (_, listed) = send(&app, request("GET", "/requests", &alice, "staff", None)).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (_, listed) = send(&app, request("GET", "/requests", &bob, "staff", None)).await;
    assert!(listed.as_array().unwrap().is_empty());

    let id = created["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        request("GET", &format!("/requests/{id}"), &bob, "staff", None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn proforma_upload_then_full_approval_finalizes_the_order() {
    let app = app();
    let uploader = user();
    let first = user();
    let second = user();

    let (status, upload) = send(
        &app,
        request(
            "POST",
            "/proformas",
            &uploader,
            "staff",
            Some(json!({
                "file_name": "acme.txt",
                "content": "Vendor: Acme Supplies\nWidget 2 5.00\nBracket 1 3.00\n",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(upload["proforma"]["vendor_name"], "Acme Supplies");
    assert_eq!(upload["order"]["draft"], true);
    let id = upload["request"]["id"].as_str().unwrap().to_string();

    let (status, mid) = send(
        &app,
        request(
            "POST",
            &format!("/requests/{id}/approve"),
            &first,
            "approver-level-1",
            Some(json!({"comment": "ok"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mid["status"], "PENDING");

    let (status, done) = send(
        &app,
        request(
            "POST",
            &format!("/requests/{id}/approve"),
            &second,
            "approver-level-2",
            Some(json!({})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "APPROVED");

    let (status, order) = send(
        &app,
        request(
            "GET",
            &format!("/requests/{id}/order"),
            &uploader,
            "staff",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["draft"], false);
    assert!(
        order["reference"]
            .as_str()
            .unwrap()
            .starts_with(&format!("PO-{id}-"))
    );

    let (status, financed) = send(
        &app,
        request("GET", "/finance/requests", &user(), "finance", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(financed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn workflow_conflicts_map_to_http_statuses() {
    let app = app();
    let alice = user();
    let approver = user();

    let (_, created) = send(
        &app,
        request("POST", "/requests", &alice, "staff", Some(create_body())),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    send(
        &app,
        request(
            "POST",
            &format!("/requests/{id}/approve"),
            &approver,
            "approver-level-1",
            Some(json!({})),
        ),
    )
    .await;

    // Same approver, same level: 409 duplicate_action.
    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/requests/{id}/reject"),
            &approver,
            "approver-level-1",
            Some(json!({"comment": "changed my mind"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "duplicate_action");

    // Quorum completion without a proforma: status commits, order fails.
    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/requests/{id}/approve"),
            &user(),
            "approver-level-2",
            Some(json!({})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "missing_proforma");

    let (_, stored) = send(
        &app,
        request("GET", &format!("/requests/{id}"), &alice, "staff", None),
    )
    .await;
    assert_eq!(stored["status"], "APPROVED");

    // Terminal state: edits are 409 invalid_state.
    let (status, body) = send(
        &app,
        request(
            "PATCH",
            &format!("/requests/{id}"),
            &alice,
            "staff",
            Some(json!({"title": "too late"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "invalid_state");

    // Receipts still land after the terminal transition.
    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/requests/{id}/receipt"),
            &alice,
            "staff",
            Some(json!({"file_name": "receipt.pdf"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["receipt"]["file_name"], "receipt.pdf");
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() {
    let app = app();
    let (status, body) = send(
        &app,
        request("GET", "/requests/not-a-uuid", &user(), "staff", None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn approver_queues_filter_by_status() {
    let app = app();
    let alice = user();
    let approver = user();

    let (_, created) = send(
        &app,
        request("POST", "/requests", &alice, "staff", Some(create_body())),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, pending) = send(
        &app,
        request("GET", "/requests/pending", &approver, "approver-level-1", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending.as_array().unwrap().len(), 1);

    send(
        &app,
        request(
            "POST",
            &format!("/requests/{id}/reject"),
            &approver,
            "approver-level-1",
            Some(json!({"comment": "no budget"})),
        ),
    )
    .await;

    let (_, pending) = send(
        &app,
        request("GET", "/requests/pending", &approver, "approver-level-1", None),
    )
    .await;
    assert!(pending.as_array().unwrap().is_empty());

    let (_, reviewed) = send(
        &app,
        request("GET", "/requests/reviewed", &approver, "approver-level-1", None),
    )
    .await;
    assert_eq!(reviewed.as_array().unwrap().len(), 1);
    assert_eq!(reviewed[0]["status"], "REJECTED");

    // Queues are approver-only.
    let (status, _) = send(
        &app,
        request("GET", "/requests/pending", &alice, "staff", None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
