//! Activation endpoint and the end-to-end signup lifecycle

mod common;

use axum::http::StatusCode;
use common::{register_user, send_json, test_app};
use serde_json::json;

#[tokio::test]
async fn full_lifecycle_from_signup_to_login() {
    let harness = test_app().await;

    // sign up
    let (status, _, _) = send_json(
        &harness.app,
        "POST",
        "/api/v1/users",
        Some(json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "a-valid-password",
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // login before activation fails: create:session is not in the default set
    let credentials = json!({
        "email": "alice@example.com",
        "password": "a-valid-password",
    });
    let (status, _, _) = send_json(
        &harness.app,
        "POST",
        "/api/v1/sessions",
        Some(credentials.clone()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // redeem the token from the activation email
    let user = harness.state.users.find_one_by_username("alice").await.unwrap();
    let token = harness
        .state
        .activations
        .find_one_by_user_id(&user.id)
        .await
        .unwrap()
        .expect("signup must issue a token");

    let (status, _, body) = send_json(
        &harness.app,
        "PATCH",
        &format!("/api/v1/activations/{}", token.id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["used_at"].is_string());
    assert!(body.get("user_id").is_none(), "owner id is not exposed");

    // login now succeeds
    let (status, _, _) = send_json(
        &harness.app,
        "POST",
        "/api/v1/sessions",
        Some(credentials),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn redeeming_twice_is_not_found() {
    let harness = test_app().await;
    let user = register_user(&harness.state, "alice").await;
    let token = harness.state.activations.issue(&user.id).await.unwrap();

    let uri = format!("/api/v1/activations/{}", token.id);

    let (status, _, _) = send_json(&harness.app, "PATCH", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send_json(&harness.app, "PATCH", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["name"], "NotFoundError");
}

#[tokio::test]
async fn unknown_tokens_are_not_found() {
    let harness = test_app().await;

    let (status, _, body) = send_json(
        &harness.app,
        "PATCH",
        "/api/v1/activations/never-issued",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({
            "name": "NotFoundError",
            "message": "The activation token was not found in the system or has expired.",
            "action": "Sign up again to receive a new activation token.",
            "status_code": 404,
        })
    );
}

#[tokio::test]
async fn status_reports_the_database_dependency() {
    let harness = test_app().await;

    let (status, _, body) = send_json(&harness.app, "GET", "/api/v1/status", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["updated_at"].is_string());

    let database = &body["dependencies"]["database"];
    assert!(database["version"].is_string());
    assert!(database["max_connections"].as_u64().unwrap() >= 1);
    assert!(database["opened_connections"].as_u64().unwrap() >= 1);
}
