#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use debt_tracker_server::{
    AppState,
    auth::create_user,
    clock::FixedClock,
    constants::*,
    database,
    models::{Debt, DebtStatus, NewDebt},
    routes::routes,
    store::DebtStore,
};
use rust_decimal::Decimal;
use serde_json::Value;
use time::{Date, Duration as DateDuration, macros::date};
use tower::util::ServiceExt;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::Key};

/// The date every test app treats as "today"
pub const TODAY: Date = date!(2024 - 03 - 15);

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub async fn setup_test_app() -> anyhow::Result<TestApp> {
    let temp_dir = tempfile::tempdir()?;
    let data_path = temp_dir.path().to_string_lossy().to_string();
    // Keep the directory alive for the rest of the test process
    std::mem::forget(temp_dir);

    let db = database::init_db(&data_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize database: {}", e))?;

    let state = AppState {
        db,
        clock: Arc::new(FixedClock(TODAY)),
    };

    let session_secret = "test_secret_key_at_least_64_chars_long_test_secret_key_at_least_64_";
    let session_key = Key::try_from(session_secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("Invalid session secret: {}", e))?;

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_name(SESSION_NAME)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(SESSION_EXPIRY_DAYS)))
        .with_signed(session_key);

    let router = routes().layer(session_layer).with_state(state.clone());

    Ok(TestApp { router, state })
}

pub async fn create_test_user(
    state: &AppState,
    username: &str,
    password: &str,
) -> anyhow::Result<String> {
    let user = create_user(&state.db, username, password)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create test user: {}", e))?;
    Ok(user.id)
}

pub async fn login_user(app: &Router, username: &str, password: &str) -> anyhow::Result<String> {
    let payload = serde_json::json!({
        "username": username,
        "password": password
    });

    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .map_err(|e| anyhow::anyhow!("Failed to build request: {}", e))?;

    let response = app
        .clone()
        .oneshot(request)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to execute request: {}", e))?;

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| anyhow::anyhow!("No session cookie in response"))?;

    // Only the name=value pair belongs in a Cookie header
    let cookie = set_cookie.split(';').next().unwrap_or_default();
    Ok(cookie.to_string())
}

/// Create a user and log them in, returning `(user_id, cookie)`
pub async fn signed_in_user(app: &TestApp, username: &str) -> anyhow::Result<(String, String)> {
    let user_id = create_test_user(&app.state, username, "password123").await?;
    let cookie = login_user(&app.router, username, "password123").await?;
    Ok((user_id, cookie))
}

fn parse_body_as_json_or_string(bytes: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => value,
        Err(_) => Value::String(String::from_utf8_lossy(bytes).to_string()),
    }
}

pub async fn json_request(
    app: &TestApp,
    method: &str,
    uri: &str,
    cookie: &str,
    payload: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if !cookie.is_empty() {
        builder = builder.header("cookie", cookie);
    }
    let body = match payload {
        Some(payload) => {
            builder = builder.header("content-type", "application/json");
            Body::from(payload.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("build request");

    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("execute request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    (status, parse_body_as_json_or_string(&bytes))
}

pub async fn get_json(app: &TestApp, uri: &str, cookie: &str) -> (StatusCode, Value) {
    json_request(app, "GET", uri, cookie, None).await
}

pub fn days_from_today(days: i64) -> Date {
    TODAY + DateDuration::days(days)
}

pub fn amount(raw: &str) -> Decimal {
    Decimal::from_str(raw).expect("valid decimal literal")
}

/// Insert straight through the store, bypassing request validation (so past
/// due dates and paid debts can be set up directly)
pub async fn insert_debt(
    app: &TestApp,
    owner_id: &str,
    lender_name: &str,
    amount_text: &str,
    due_date: Date,
    status: DebtStatus,
) -> Debt {
    DebtStore::for_owner(&app.state.db, owner_id)
        .insert(NewDebt {
            lender_name: lender_name.to_string(),
            amount: amount(amount_text),
            due_date,
            status,
            description: None,
        })
        .await
        .expect("insert debt")
}

/// Decimal carried as a JSON string
pub fn json_amount(value: &Value) -> Decimal {
    amount(value.as_str().expect("amount serialized as string"))
}
