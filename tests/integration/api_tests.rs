//! API tests driving the router in-process
//!
//! Every test builds its own state: the session is shared by all
//! requests served from one state.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use simpanse_server::{
    api,
    config::AppConfig,
    repository::{Repository, SharedRepository},
    services::{self, persistence::MemorySnapshotStore, Services},
    AppState,
};

async fn test_app() -> Router {
    let config = AppConfig::default();
    let repository = SharedRepository::new(Repository::default());
    let services = Services::new(repository, Arc::new(MemorySnapshotStore::default()), &config);
    let seed = services::seed_repository().expect("seed data");
    services.persistence.restore(seed).await;

    api::create_router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

async fn login(app: &Router, username: &str, password: &str) {
    let (status, _) = send_json(
        app,
        "POST",
        "/api/v1/session/login",
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login as {}", username);
}

async fn logout(app: &Router) {
    let (status, _) = send(app, "POST", "/api/v1/session/logout", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

async fn available(app: &Router, item_id: &str) -> u64 {
    let (status, item) = send_json(app, "GET", &format!("/api/v1/items/{}", item_id), None).await;
    assert_eq!(status, StatusCode::OK);
    item["availableQuantity"].as_u64().expect("availableQuantity")
}

fn loan_form(item_id: &str, quantity: u32, email: &str) -> Value {
    json!({
        "mode": "submit",
        "itemId": item_id,
        "quantity": quantity,
        "borrowerName": "Siti Rahma",
        "borrowerNIK": "8271012304950001",
        "borrowerAddress": "Jl. Pahlawan Revolusi No. 5, Ternate",
        "borrowerType": "Pribadi",
        "borrowerEmail": email,
        "borrowerPhone": "082292313876",
        "purpose": "Workshop guru",
        "startDate": "2026-10-20",
        "endDate": "2026-10-22",
        "signature": "data:image/png;base64,iVBORw0KGgo=",
        "termsAccepted": true
    })
}

async fn submit(app: &Router, item_id: &str, quantity: u32, email: &str) -> String {
    let (status, receipt) = send_json(
        app,
        "POST",
        "/api/v1/loans",
        Some(loan_form(item_id, quantity, email)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", receipt);
    assert_eq!(receipt["loan"]["status"], "Pending");
    receipt["loan"]["id"].as_str().expect("loan id").to_string()
}

#[tokio::test]
async fn test_health_and_readiness() {
    let app = test_app().await;

    let (status, body) = send_json(&app, "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send_json(&app, "GET", "/api/v1/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemCount"], 5);
}

#[tokio::test]
async fn test_full_loan_lifecycle_moves_stock() {
    let app = test_app().await;
    assert_eq!(available(&app, "1").await, 10);

    let id = submit(&app, "1", 3, "siti@example.com").await;

    login(&app, "admin", "admin123").await;
    let (status, loan) = send_json(&app, "POST", &format!("/api/v1/loans/{}/verify", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loan["status"], "Verified");

    login(&app, "verify", "verify123").await;
    let (status, loan) = send_json(&app, "POST", &format!("/api/v1/loans/{}/approve", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loan["status"], "Approved");
    assert_eq!(available(&app, "1").await, 7);

    login(&app, "admin", "admin123").await;
    let (status, loan) = send_json(&app, "POST", &format!("/api/v1/loans/{}/return", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loan["status"], "Returned");
    assert_eq!(available(&app, "1").await, 10);
}

#[tokio::test]
async fn test_approving_twice_is_a_conflict() {
    let app = test_app().await;
    let id = submit(&app, "3", 2, "budi@example.com").await;

    login(&app, "admin", "admin123").await;
    send_json(&app, "POST", &format!("/api/v1/loans/{}/verify", id), None).await;

    login(&app, "verify", "verify123").await;
    let (status, _) = send_json(&app, "POST", &format!("/api/v1/loans/{}/approve", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(&app, "POST", &format!("/api/v1/loans/{}/approve", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "InvalidTransition");

    let (_, item) = send_json(&app, "GET", "/api/v1/items/3", None).await;
    assert_eq!(item["availableQuantity"], 0);
    assert_eq!(item["status"], "Out of Stock");
}

#[tokio::test]
async fn test_reject_requires_reason() {
    let app = test_app().await;
    let id = submit(&app, "2", 1, "ani@example.com").await;

    login(&app, "admin", "admin123").await;
    let uri = format!("/api/v1/loans/{}/reject", id);

    let (status, _) = send_json(&app, "POST", &uri, Some(json!({ "reason": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, loan) = send_json(&app, "POST", &uri, Some(json!({ "reason": "KTP tidak terbaca" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loan["status"], "Rejected");
    assert_eq!(loan["rejectionReason"], "KTP tidak terbaca");
}

#[tokio::test]
async fn test_wrong_role_is_forbidden() {
    let app = test_app().await;
    let id = submit(&app, "1", 1, "siti@example.com").await;

    // Borrowers cannot act on loans
    let (status, _) = send_json(&app, "POST", &format!("/api/v1/loans/{}/verify", id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Approval belongs to the verificator
    login(&app, "admin", "admin123").await;
    let (status, _) = send_json(&app, "POST", &format!("/api/v1/loans/{}/approve", id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Staff cannot file loans
    let (status, _) = send_json(&app, "POST", "/api/v1/loans", Some(loan_form("1", 1, "x@example.com"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_submit_rejects_unavailable_items() {
    let app = test_app().await;

    let (status, body) = send_json(&app, "POST", "/api/v1/loans", Some(loan_form("4", 1, "a@example.com"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "ItemNotAvailable");

    let (status, _) = send_json(&app, "POST", "/api/v1/loans", Some(loan_form("5", 4, "a@example.com"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(&app, "POST", "/api/v1/loans", Some(loan_form("missing", 1, "a@example.com"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_returning_borrower_lookup() {
    let app = test_app().await;

    let lookup = json!({ "email": "siti@example.com", "nikSuffix": "0001", "itemId": "1" });
    let (status, _) = send_json(&app, "POST", "/api/v1/loans/lookup", Some(lookup.clone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    submit(&app, "1", 1, "siti@example.com").await;
    logout(&app).await;

    let (status, body) = send_json(&app, "POST", "/api/v1/loans/lookup", Some(lookup)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["borrowerName"], "Siti Rahma");
    assert_eq!(body["borrowCount"], 0);

    let (_, session) = send_json(&app, "GET", "/api/v1/session", None).await;
    assert_eq!(session["borrower"]["email"], "siti@example.com");

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/v1/loans/lookup",
        Some(json!({ "email": "siti@example.com", "nikSuffix": "12" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_csv() {
    let app = test_app().await;

    login(&app, "admin", "admin123").await;
    let (status, _) = send(&app, "GET", "/api/v1/loans/export", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    logout(&app).await;

    let id = submit(&app, "2", 1, "ani@example.com").await;
    login(&app, "admin", "admin123").await;

    let (status, bytes) = send(&app, "GET", "/api/v1/loans/export", None).await;
    assert_eq!(status, StatusCode::OK);
    let csv = String::from_utf8(bytes).expect("utf-8");
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("ID,Borrower Name,NIK,Asset,Status,Start Date,End Date")
    );
    let row = lines.next().expect("one row");
    assert!(row.starts_with(&id));
    assert!(row.contains("Proyektor Epson EB-X400"));
}

#[tokio::test]
async fn test_openapi_is_served() {
    let app = test_app().await;
    let (status, doc) = send_json(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/loans/{id}/approve"].is_object());
}
