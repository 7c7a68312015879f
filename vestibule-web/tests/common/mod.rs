//! Shared helpers for API integration tests

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use vestibule_app::{database, ActivationToken, MemoryMailer, User};
use vestibule_core::{AppConfig, PasswordConfig};
use vestibule_web::{create_app, AppState};

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub mailer: MemoryMailer,
}

pub async fn test_app() -> TestApp {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    database::prepare_database(&pool).await.unwrap();

    let config = AppConfig {
        password: PasswordConfig {
            pepper: "api-test-pepper".to_string(),
            minimal_cost: true,
        },
        ..AppConfig::default()
    };

    let mailer = MemoryMailer::new();
    let state = AppState::with_pool(config, Arc::new(mailer.clone()), pool).unwrap();

    TestApp {
        app: create_app(state.clone()),
        state,
        mailer,
    }
}

/// One request through the router; returns status, headers and raw body
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> (StatusCode, HeaderMap, String) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, format!("session_id={}", cookie));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Same as [`send`], with the body parsed as JSON
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> (StatusCode, HeaderMap, Value) {
    let (status, headers, raw) = send(app, method, uri, body, cookie).await;
    let json = serde_json::from_str(&raw).unwrap_or(Value::Null);
    (status, headers, json)
}

/// Pull the session token out of a Set-Cookie header
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers.get_all(header::SET_COOKIE).iter().find_map(|value| {
        let value = value.to_str().ok()?;
        let rest = value.strip_prefix("session_id=")?;
        let token = rest.split(';').next()?;
        (token != "invalid").then(|| token.to_string())
    })
}

/// Register a user straight through the store
pub async fn register_user(state: &AppState, username: &str) -> User {
    state
        .users
        .create(vestibule_app::NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username.to_lowercase()),
            password: "a-valid-password".to_string(),
        })
        .await
        .unwrap()
}

/// Issue and redeem an activation token for a user
pub async fn activate_user(state: &AppState, user: &User) -> ActivationToken {
    let token = state.activations.issue(&user.id).await.unwrap();
    state.activations.redeem(&token.id).await.unwrap()
}

/// Register, activate and log a user in; returns the session token
pub async fn login_user(app: &Router, state: &AppState, username: &str) -> String {
    let user = register_user(state, username).await;
    activate_user(state, &user).await;

    let (status, headers, _) = send_json(
        app,
        "POST",
        "/api/v1/sessions",
        Some(serde_json::json!({
            "email": user.email,
            "password": "a-valid-password",
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    session_token(&headers).expect("login must set a session cookie")
}
