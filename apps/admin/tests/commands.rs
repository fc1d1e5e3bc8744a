//! Admin commands driven end to end against an in-process fake API.

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use clap::Parser;
use jsonwebtoken::{encode, EncodingKey, Header};
use optica_admin_lib::cli::Cli;
use optica_admin_lib::commands::{self, sales, Outcome};
use optica_admin_lib::error::{AppResult, ErrorCode};
use optica_admin_lib::notify::Level;
use optica_admin_lib::state::AppState;
use optica_api::{AdminConfig, Claims, MemoryTokenStore};
use optica_core::sale::ProductLine;
use optica_core::{ClientRef, Money, Product, ProductCategory, SaleDraft};
use serde_json::{json, Value};
use tokio::net::TcpListener;

// =============================================================================
// Fake Store API
// =============================================================================

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    body: Value,
}

#[derive(Default)]
struct Fake {
    token: String,
    requests: Mutex<Vec<Recorded>>,
}

impl Fake {
    fn find(&self, method: &str, path: &str) -> Option<Recorded> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.method == method && r.path == path)
            .cloned()
    }

    fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn issue_token() -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: "bruno@otica.com".into(),
        exp: now + 3600,
        iat: Some(now),
        role: Some("SELLER".into()),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"fake-secret")).unwrap()
}

fn sale_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "client": { "id": 3, "name": "Ana Souza" },
        "items": [{
            "id": 1,
            "product": { "id": 10, "name": "Ray-Ban RB5154", "category": "FRAME", "salePrice": 520.0 },
            "quantity": 1,
            "unitPrice": 500.0,
            "frameDetails": { "color": "tortoise" }
        }],
        "services": [],
        "subtotal": 500.0,
        "discount": 0.0,
        "total": 500.0,
        "status": status
    })
}

fn payments_json() -> Value {
    json!([{
        "id": 5,
        "saleId": 7,
        "method": "BANK_SLIP",
        "amount": 200.0,
        "installments": [
            { "id": 51, "number": 1, "amount": 100.0, "dueDate": "2020-01-10", "status": "PENDING" },
            { "id": 52, "number": 2, "amount": 100.0, "dueDate": "2020-02-10",
              "paidAt": "2020-02-09", "status": "PAID" }
        ]
    }])
}

async fn handle(
    State(fake): State<Arc<Fake>>,
    method: Method,
    uri: Uri,
    _headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    fake.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        body: body.clone(),
    });

    let ok = |data: Value| (StatusCode::OK, json!({ "data": data }).to_string());
    let (status, text) = match (method.as_str(), uri.path()) {
        ("POST", "/auth/login") => ok(json!({ "token": fake.token })),
        ("GET", "/sales/7") => ok(sale_json(7, "PENDING")),
        ("PUT", "/sales/7") => ok(sale_json(7, "PENDING")),
        ("GET", "/sales/7/payments") => ok(payments_json()),
        ("GET", "/sales/9") => ok(sale_json(9, "PENDING")),
        ("GET", "/sales/9/payments") => ok(json!([{
            "id": 8, "saleId": 9, "method": "CREDIT_CARD", "amount": 500.0,
            "installments": [
                { "id": 81, "number": 1, "amount": 250.0, "dueDate": "2099-01-10", "status": "PENDING" },
                { "id": 82, "number": 2, "amount": 250.0, "dueDate": "2099-02-10", "status": "PENDING" }
            ]
        }])),
        ("POST", "/payments") => ok(json!({
            "id": 6, "saleId": 7, "method": "CREDIT_CARD", "amount": body["amount"].clone(),
            "installments": []
        })),
        _ => (StatusCode::NOT_FOUND, json!({ "message": "Sale not found" }).to_string()),
    };
    (status, [(header::CONTENT_TYPE, "application/json")], text)
}

async fn start() -> (String, Arc<Fake>) {
    let fake = Arc::new(Fake {
        token: issue_token(),
        ..Default::default()
    });
    let app = Router::new().fallback(handle).with_state(fake.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    (format!("http://{addr}"), fake)
}

async fn state(base_url: &str) -> AppState {
    let mut config = AdminConfig::default();
    config.api.base_url = base_url.to_string();
    AppState::with_store(config, Arc::new(MemoryTokenStore::new())).await.unwrap()
}

async fn run(state: &AppState, args: &[&str]) -> AppResult<Outcome> {
    let cli = Cli::try_parse_from(std::iter::once("optica-admin").chain(args.iter().copied())).unwrap();
    commands::dispatch(state, cli.command).await
}

fn frame(cents: i64) -> Product {
    Product {
        id: 10,
        name: "Oakley Holbrook".into(),
        category: ProductCategory::Frame,
        brand: Some("Oakley".into()),
        code: None,
        sale_price: Some(Money::from_cents(cents)),
        cost_price: None,
        stock: Some(2),
        active: true,
    }
}

// =============================================================================
// Offline
// =============================================================================

#[tokio::test]
async fn test_totals_of_a_draft() {
    let state = state("http://127.0.0.1:9").await;
    let draft = SaleDraft {
        client: Some(ClientRef { id: 3, name: "Ana Souza".into() }),
        products: vec![ProductLine::new(frame(45_000), 2)],
        discount: Money::from_cents(5_000),
        ..Default::default()
    };

    let outcome = sales::totals(&state, &draft);
    assert!(outcome.output.contains("Oakley Holbrook x2  R$ 900.00"));
    assert!(outcome.output.contains("Subtotal"));
    assert!(outcome.output.contains("R$ 850.00"));
    assert!(outcome.notices.is_empty());
}

#[tokio::test]
async fn test_totals_warn_about_an_incomplete_draft() {
    let state = state("http://127.0.0.1:9").await;
    let draft = SaleDraft {
        discount: Money::from_cents(100),
        ..Default::default()
    };

    let outcome = sales::totals(&state, &draft);
    assert!(outcome.output.contains("Total"));
    assert!(outcome.notices.iter().all(|n| n.level == Level::Warning));
    assert!(outcome.notices.iter().any(|n| n.message.starts_with("clientId: ")));
}

#[tokio::test]
async fn test_online_commands_need_a_session() {
    let (base, fake) = start().await;
    let state = state(&base).await;

    let err = run(&state, &["sales", "show", "7"]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);
    assert_eq!(fake.count(), 0);
}

// =============================================================================
// Online
// =============================================================================

#[tokio::test]
async fn test_login_then_whoami() {
    let (base, _fake) = start().await;
    let state = state(&base).await;

    let outcome = run(&state, &["login", "--email", "bruno@otica.com", "--password", "pw"])
        .await
        .unwrap();
    assert_eq!(outcome.notices[0].level, Level::Success);
    assert!(outcome.notices[0].message.starts_with("Logged in as bruno@otica.com"));

    let outcome = run(&state, &["whoami"]).await.unwrap();
    assert!(outcome.output.contains("Role      SELLER"));

    run(&state, &["logout"]).await.unwrap();
    let err = run(&state, &["whoami"]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);
}

#[tokio::test]
async fn test_payments_list_flags_overdue_installments() {
    let (base, _fake) = start().await;
    let state = state(&base).await;
    state.client.auth().login("bruno@otica.com", "pw").await.unwrap();

    let outcome = run(&state, &["payments", "list", "7"]).await.unwrap();
    // One installment of 100.00 paid against a total of 500.00.
    assert!(outcome.output.contains("R$ 400.00"));
    assert!(outcome.output.contains("overdue"));
    assert_eq!(outcome.notices.len(), 1);
    assert!(outcome.notices[0].message.contains("Installment #1"));
}

#[tokio::test]
async fn test_payment_plan_is_registered_only_on_submit() {
    let (base, fake) = start().await;
    let state = state(&base).await;
    state.client.auth().login("bruno@otica.com", "pw").await.unwrap();

    // 500.00 sale, 200.00 already financed: 300.00 left to plan.
    let args = ["payments", "plan", "7", "--count", "4", "--first-due", "2026-11-10"];
    let outcome = run(&state, &args).await.unwrap();
    assert!(outcome.output.contains("R$ 75.00"));
    assert_eq!(outcome.notices[0].level, Level::Warning);
    assert!(fake.find("POST", "/payments").is_none());

    let mut submit = args.to_vec();
    submit.push("--submit");
    let outcome = run(&state, &submit).await.unwrap();
    assert_eq!(outcome.notices[0].level, Level::Success);

    let sent = fake.find("POST", "/payments").unwrap();
    assert_eq!(sent.body["saleId"], 7);
    assert_eq!(sent.body["method"], "CREDIT_CARD");
    assert_eq!(sent.body["amount"], 300.0);
    assert_eq!(sent.body["installments"].as_array().unwrap().len(), 4);
    assert_eq!(sent.body["installments"][3]["dueDate"], "2027-02-10");
}

#[tokio::test]
async fn test_plan_larger_than_balance_is_refused() {
    let (base, fake) = start().await;
    let state = state(&base).await;
    state.client.auth().login("bruno@otica.com", "pw").await.unwrap();

    let err = run(
        &state,
        &["payments", "plan", "7", "--first-due", "2026-11-10", "--amount", "350.00", "--submit"],
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::PaymentError);
    assert!(fake.find("POST", "/payments").is_none());
}

#[tokio::test]
async fn test_fully_financed_sale_takes_no_new_plan() {
    let (base, fake) = start().await;
    let state = state(&base).await;
    state.client.auth().login("bruno@otica.com", "pw").await.unwrap();

    // Nothing paid yet, but the whole total is already financed.
    let outcome = run(&state, &["payments", "list", "9"]).await.unwrap();
    assert!(outcome.output.contains("Remaining"));
    assert!(outcome.output.contains("R$ 500.00"));

    for extra in [&[][..], &["--amount", "100.00"][..]] {
        let mut args = vec!["payments", "plan", "9", "--count", "3", "--first-due", "2026-11-10", "--submit"];
        args.extend_from_slice(extra);
        let err = run(&state, &args).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentError);
    }
    assert!(fake.find("POST", "/payments").is_none());
}

#[tokio::test]
async fn test_edit_then_submit_round_trip_through_a_file() {
    let (base, fake) = start().await;
    let state = state(&base).await;
    state.client.auth().login("bruno@otica.com", "pw").await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sale-7.json");
    let path_arg = path.to_str().unwrap();

    run(&state, &["sales", "edit", "7", "--out", path_arg]).await.unwrap();
    let draft: SaleDraft = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    // The charged price is kept, not the current catalog price.
    assert_eq!(draft.products[0].product.sale_price, Some(Money::from_cents(50_000)));

    let outcome = run(&state, &["sales", "submit", path_arg, "--id", "7"]).await.unwrap();
    assert!(outcome.notices[0].message.starts_with("Sale 7 updated"));

    let sent = fake.find("PUT", "/sales/7").unwrap();
    assert_eq!(sent.body["clientId"], 3);
    assert_eq!(sent.body["items"][0]["productId"], 10);
    assert_eq!(sent.body["items"][0]["frameDetails"]["color"], "tortoise");
    assert!(sent.body.get("total").is_none());
}

#[tokio::test]
async fn test_api_message_reaches_the_operator() {
    let (base, _fake) = start().await;
    let state = state(&base).await;
    state.client.auth().login("bruno@otica.com", "pw").await.unwrap();

    let err = run(&state, &["sales", "show", "8"]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.message, "Sale not found");
}
