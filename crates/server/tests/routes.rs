use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use ledger::{Ledger, LedgerError, Ocr, PdfRenderer};
use migration::MigratorTrait;
use server::{ServerState, router};

struct FixedOcr(&'static str);

#[async_trait::async_trait]
impl Ocr for FixedOcr {
    async fn recognize(&self, _image: &[u8]) -> Result<String, LedgerError> {
        Ok(self.0.to_string())
    }
}

struct FixedPdf;

#[async_trait::async_trait]
impl PdfRenderer for FixedPdf {
    async fn render(&self, _html: &str) -> Result<Vec<u8>, LedgerError> {
        Ok(b"%PDF-1.4 stub".to_vec())
    }
}

async fn app_with_ocr(text: &'static str) -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    router(ServerState::new(
        Ledger::new(db),
        Arc::new(FixedOcr(text)),
        Arc::new(FixedPdf),
    ))
}

async fn app() -> Router {
    app_with_ocr("").await
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn account_crud_over_http() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/accounts",
            json!({
                "name": "Checking",
                "institution": "First Bank",
                "kind": "bank",
                "balance_minor": 50_000
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app.clone().oneshot(get(&format!("/accounts/{id}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = json_body(response).await;
    assert_eq!(fetched["name"], "Checking");
    assert_eq!(fetched["kind"], "bank");

    let response = app.clone().oneshot(get("/accounts")).await.unwrap();
    let listed = json_body(response).await;
    assert_eq!(listed["accounts"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/accounts/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/accounts/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_account_id_is_not_found() {
    let app = app().await;

    let response = app.oneshot(get("/accounts/not-a-uuid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn budget_create_normalizes_and_rejects_duplicates() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/budgets",
            json!({ "category": " Groceries ", "limit_minor": 10_000 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert_eq!(created["category"], "groceries");
    assert_eq!(created["spent_minor"], 0);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/budgets",
            json!({ "category": "GROCERIES", "limit_minor": 20_000 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn both_spend_update_routes_hit_the_same_counter() {
    let app = app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/budgets",
            json!({ "category": "groceries", "limit_minor": 10_000 }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/budgets/Groceries?amount_minor=250")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let budget = json_body(response).await;
    assert_eq!(budget["spent_minor"], 250);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/budgets/update_spent",
            json!({ "category": "GROCERIES", "amount_minor": 250 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let budget = json_body(response).await;
    assert_eq!(budget["spent_minor"], 500);
}

#[tokio::test]
async fn spend_update_on_missing_budget_is_not_found() {
    let app = app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/budgets/fuel?amount_minor=100")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expense_transaction_updates_budget_over_http() {
    let app = app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/budgets",
            json!({ "category": "food", "limit_minor": 10_000 }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/transactions",
            json!({ "kind": "expense", "amount_minor": 500, "category": "Food" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.clone().oneshot(get("/budgets")).await.unwrap();
    let listed = json_body(response).await;
    assert_eq!(listed["budgets"][0]["spent_minor"], 500);
}

#[tokio::test]
async fn transaction_crud_over_http() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/transactions",
            json!({ "kind": "expense", "amount_minor": 1_250, "category": "Food" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/transactions/{id}"),
            json!({ "kind": "expense", "amount_minor": 800, "category": "Travel" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get(&format!("/transactions/{id}")))
        .await
        .unwrap();
    let fetched = json_body(response).await;
    assert_eq!(fetched["amount_minor"], 800);
    assert_eq!(fetched["category"], "Travel");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/transactions/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get(&format!("/transactions/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn negative_transaction_amount_is_rejected() {
    let app = app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/transactions",
            json!({ "kind": "expense", "amount_minor": -100 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bill_upload_stores_a_shopping_transaction() {
    let app = app_with_ocr("SOME STORE\nGRAND TOTAL: 1,234.56\nTHANK YOU").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/bills/upload")
                .body(Body::from(vec![0xff, 0xd8, 0xff]))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["transaction"]["amount_minor"], 123_456);
    assert_eq!(body["transaction"]["category"], "Shopping");
    assert_eq!(body["transaction"]["description"], "Shopping Bill");

    let response = app.clone().oneshot(get("/transactions")).await.unwrap();
    let listed = json_body(response).await;
    assert_eq!(listed["transactions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn bill_upload_without_total_is_a_bad_request() {
    let app = app_with_ocr("no recognizable totals here").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/bills/upload")
                .body(Body::from(vec![0xff]))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was stored.
    let response = app.clone().oneshot(get("/transactions")).await.unwrap();
    let listed = json_body(response).await;
    assert!(listed["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn empty_bill_upload_is_a_bad_request() {
    let app = app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/bills/upload")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn export_with_no_transactions_is_not_found() {
    let app = app().await;

    let response = app
        .oneshot(get("/export-transactions?format=csv"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn export_csv_returns_an_attachment() {
    let app = app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/transactions",
            json!({
                "kind": "expense",
                "amount_minor": 1_250,
                "category": "Food",
                "occurred_at": "2024-01-01T09:30:00Z",
                "description": "Lunch"
            }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get("/export-transactions?format=csv"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "text/csv"
    );
    assert!(
        response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("transactions.csv")
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Date,Category,Amount,Description"));
    assert_eq!(lines.next(), Some("2024-01-01,Food,₹12.50,Lunch"));
}

#[tokio::test]
async fn export_pdf_goes_through_the_renderer() {
    let app = app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/transactions",
            json!({ "kind": "expense", "amount_minor": 500, "category": "Food" }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get("/export-transactions?format=pdf"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "application/pdf"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn export_with_unknown_format_is_a_bad_request() {
    let app = app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/transactions",
            json!({ "kind": "expense", "amount_minor": 500 }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get("/export-transactions?format=xlsx"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("xlsx"));
}

#[tokio::test]
async fn expense_crud_over_http() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/expenses",
            json!({ "title": "Lunch", "amount_minor": 1_250, "category": "Food" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app.clone().oneshot(get("/expenses")).await.unwrap();
    let listed = json_body(response).await;
    assert_eq!(listed["expenses"].as_array().unwrap().len(), 1);
    assert_eq!(listed["expenses"][0]["title"], "Lunch");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/expenses/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/expenses/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
