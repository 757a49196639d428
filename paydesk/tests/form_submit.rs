// paydesk/tests/form_submit.rs
// Submitting drafts through the offline client

use std::sync::Arc;
use std::time::Duration;

use axum::extract::Multipart;
use axum::routing::post;
use axum::{Json, Router};
use paydesk::core::Route;
use paydesk::form::{RequestForm, SubmitError};
use paydesk_client::{ClientConfig, OfflineClient, Origin, SessionStore};
use serde_json::{Value, json};
use shared::models::{RequestStatus, TemplateType};
use shared::{AppError, ErrorCode};
use tempfile::TempDir;

const UNREACHABLE: &str = "http://127.0.0.1:1/api";

const TOOLS_DRAFT: &str = r#"{
    "type": "tools",
    "currency": "USD",
    "items": [
        {"toolName": "SEMrush Pro", "toolCategory": "SEO", "paymentFrequency": "monthly", "amount": "229"}
    ]
}"#;

fn client(base_url: &str, fallback: bool) -> OfflineClient {
    let config = ClientConfig::new(base_url)
        .with_timeout(5)
        .with_fallback(fallback);
    OfflineClient::connect(&config, Arc::new(SessionStore::in_memory())).unwrap()
}

async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api", addr)
}

/// Echoes the payload back as a stored request after a delay
async fn slow_create(Json(mut body): Json<Value>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(300)).await;
    body["id"] = json!(77);
    body["status"] = json!("pending");
    body["createdAt"] = json!("2024-02-01T09:30:00Z");
    Json(body)
}

/// Stores the `file` part and answers with a CDN-style URL
async fn store_upload(mut multipart: Multipart) -> Json<Value> {
    let mut filename = String::new();
    let mut size = 0;
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() == Some("file") {
            filename = field.file_name().unwrap_or_default().to_string();
            size = field.bytes().await.unwrap().len();
        }
    }
    Json(json!({"url": format!("https://files.example.com/{size}/{filename}"), "filename": filename}))
}

async fn echo_create(Json(mut body): Json<Value>) -> Json<Value> {
    body["id"] = json!(88);
    body["status"] = json!("pending");
    body["createdAt"] = json!("2024-02-01T09:30:00Z");
    Json(body)
}

/// Tools draft with an invoice file written next to it
fn draft_with_invoice(dir: &TempDir, name: &str) -> RequestForm {
    let invoice = dir.path().join(name);
    std::fs::write(&invoice, b"%PDF-1.4 invoice").unwrap();
    let mut form = RequestForm::from_draft(TOOLS_DRAFT).unwrap();
    assert!(form.attach(Some(invoice)));
    form
}

#[tokio::test]
async fn test_submit_falls_back_to_mock() {
    let form = RequestForm::from_draft(TOOLS_DRAFT).unwrap();
    assert_eq!(shared::money::format_decimal(form.total()), "229.00");

    let outcome = form.submit(&client(UNREACHABLE, true)).await.unwrap();
    assert_eq!(outcome.origin, Origin::Mock);
    assert_eq!(outcome.next_route, Route::Requests);
    assert_eq!(outcome.request.status, RequestStatus::Pending);
    assert_eq!(outcome.request.template(), TemplateType::Tools);
    assert_eq!(outcome.request.total_amount, 229.0);
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn test_submit_without_fallback_fails() {
    let form = RequestForm::from_draft(TOOLS_DRAFT).unwrap();
    let err = form.submit(&client(UNREACHABLE, false)).await.unwrap_err();
    assert!(matches!(err, SubmitError::Failed(_)));
    assert_eq!(err.to_string(), "Submission failed, please try again");
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn test_invalid_draft_never_reaches_backend() {
    let draft = r#"{"type":"link_building","vendorName":"Acme","invoiceNumber":"INV-1",
        "items":[
            {"clientProjectType":"client","selectedClientProject":"client1","amount":"100"},
            {"clientProjectType":"client","selectedClientProject":"client2","amount":"bad"}
        ]}"#;
    let form = RequestForm::from_draft(draft).unwrap();
    assert_eq!(shared::money::format_decimal(form.total()), "100.00");

    // Fallback disabled: reaching the network would surface as Failed
    let err = form.submit(&client(UNREACHABLE, false)).await.unwrap_err();
    match err {
        SubmitError::Invalid(errors) => {
            assert_eq!(errors.get("items[1].amount"), Some("Item 2 amount must be a number"));
        }
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[tokio::test]
async fn test_second_submit_while_in_flight_is_rejected() {
    let base_url = spawn_backend(Router::new().route("/api/payment-requests", post(slow_create))).await;
    let client = client(&base_url, false);
    let form = RequestForm::from_draft(TOOLS_DRAFT).unwrap();

    let (first, second) = tokio::join!(form.submit(&client), form.submit(&client));

    let first = first.unwrap();
    assert_eq!(first.origin, Origin::Backend);
    assert_eq!(first.request.id, 77);
    assert!(matches!(second, Err(SubmitError::InFlight)));

    // The flag is released once the first submission completes
    assert!(!form.is_submitting());
    assert!(form.submit(&client).await.is_ok());
}

#[tokio::test]
async fn test_attachment_uploaded_through_fallback() {
    let dir = TempDir::new().unwrap();
    let form = draft_with_invoice(&dir, "invoice.pdf");

    let outcome = form.submit(&client(UNREACHABLE, true)).await.unwrap();
    let file = outcome.request.attachment.unwrap();
    assert_eq!(file.url, "mock://uploads/invoice.pdf");
    assert_eq!(file.filename, "invoice.pdf");
}

#[tokio::test]
async fn test_attachment_uploaded_before_create() {
    let base_url = spawn_backend(
        Router::new()
            .route("/api/files/upload", post(store_upload))
            .route("/api/payment-requests", post(echo_create)),
    )
    .await;
    let dir = TempDir::new().unwrap();
    let form = draft_with_invoice(&dir, "INV-7.pdf");

    let outcome = form.submit(&client(&base_url, false)).await.unwrap();
    assert_eq!(outcome.origin, Origin::Backend);
    assert_eq!(outcome.request.id, 88);
    let file = outcome.request.attachment.unwrap();
    assert_eq!(file.filename, "INV-7.pdf");
    assert_eq!(file.url, "https://files.example.com/16/INV-7.pdf");
}

#[tokio::test]
async fn test_attachment_problems_stop_submission() {
    let dir = TempDir::new().unwrap();

    let mut missing = RequestForm::from_draft(TOOLS_DRAFT).unwrap();
    missing.attach(Some(dir.path().join("gone.pdf")));
    let err = missing.submit(&client(UNREACHABLE, true)).await.unwrap_err();
    assert!(matches!(err, SubmitError::AttachmentUnreadable { .. }));
    assert_eq!(AppError::from(err).code, ErrorCode::FileUnreadable);
    assert!(!missing.is_submitting());

    let wrong_type = draft_with_invoice(&dir, "invoice.exe");
    match wrong_type.submit(&client(UNREACHABLE, true)).await.unwrap_err() {
        SubmitError::Invalid(errors) => assert!(errors.has("file")),
        other => panic!("expected validation errors, got {other:?}"),
    }

    // Upload fails without fallback, so nothing is created
    let form = draft_with_invoice(&dir, "invoice.pdf");
    let err = form.submit(&client(UNREACHABLE, false)).await.unwrap_err();
    assert!(matches!(err, SubmitError::Failed(_)));
}
