//! Authentication flow integration tests

mod common;

use common::{authenticator, create_user, test_pool, user_store};

#[tokio::test]
async fn correct_credentials_authenticate() {
    let pool = test_pool().await;
    let user = create_user(&user_store(&pool), "alice").await;
    let auth = authenticator(&pool);

    let authenticated = auth
        .authenticate("alice@example.com", "a-valid-password")
        .await
        .unwrap();

    assert_eq!(authenticated.id, user.id);
}

#[tokio::test]
async fn email_lookup_is_case_insensitive() {
    let pool = test_pool().await;
    create_user(&user_store(&pool), "alice").await;
    let auth = authenticator(&pool);

    assert!(auth
        .authenticate("ALICE@EXAMPLE.COM", "a-valid-password")
        .await
        .is_ok());
}

#[tokio::test]
async fn wrong_password_and_unknown_email_yield_byte_identical_payloads() {
    let pool = test_pool().await;
    create_user(&user_store(&pool), "alice").await;
    let auth = authenticator(&pool);

    let wrong_password = auth
        .authenticate("alice@example.com", "not-her-password")
        .await
        .unwrap_err();
    let unknown_email = auth
        .authenticate("nobody@example.com", "a-valid-password")
        .await
        .unwrap_err();

    let first = serde_json::to_string(&wrong_password.to_public()).unwrap();
    let second = serde_json::to_string(&unknown_email.to_public()).unwrap();

    assert_eq!(first, second);
    assert_eq!(wrong_password.to_public().status_code, 401);
}

#[tokio::test]
async fn authentication_failure_names_no_field() {
    let pool = test_pool().await;
    create_user(&user_store(&pool), "alice").await;
    let auth = authenticator(&pool);

    let err = auth
        .authenticate("alice@example.com", "not-her-password")
        .await
        .unwrap_err();
    let public = err.to_public();

    assert_eq!(public.message, "Authentication data does not match.");
    assert!(!public.message.to_lowercase().contains("password"));
    assert!(!public.message.to_lowercase().contains("email"));
}
