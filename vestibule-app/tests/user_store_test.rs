//! User store integration tests

mod common;

use common::{create_user, test_pool, user_store};
use vestibule_app::{Capability, NewUser, UserUpdate};

#[tokio::test]
async fn new_users_get_the_unactivated_feature_set() {
    let pool = test_pool().await;
    let store = user_store(&pool);

    let user = create_user(&store, "alice").await;

    assert_eq!(user.features, vec![Capability::ReadActivationToken]);
}

#[tokio::test]
async fn stored_password_is_never_the_plaintext() {
    let pool = test_pool().await;
    let store = user_store(&pool);

    let user = create_user(&store, "alice").await;

    assert_ne!(user.password, "a-valid-password");
    assert!(user.password.starts_with("$argon2id$"));
}

#[tokio::test]
async fn duplicate_email_is_rejected_case_insensitively() {
    let pool = test_pool().await;
    let store = user_store(&pool);

    create_user(&store, "alice").await;

    let err = store
        .create(NewUser {
            username: "someone-else".to_string(),
            email: "ALICE@example.com".to_string(),
            password: "a-valid-password".to_string(),
        })
        .await
        .unwrap_err();

    let public = err.to_public();
    assert_eq!(public.name, "ValidationError");
    assert_eq!(public.message, "The email provided is already in use.");
    assert_eq!(public.status_code, 400);
}

#[tokio::test]
async fn duplicate_username_is_rejected_case_insensitively() {
    let pool = test_pool().await;
    let store = user_store(&pool);

    create_user(&store, "User1").await;

    let err = store
        .create(NewUser {
            username: "user1".to_string(),
            email: "different@example.com".to_string(),
            password: "a-valid-password".to_string(),
        })
        .await
        .unwrap_err();

    let public = err.to_public();
    assert_eq!(public.name, "ValidationError");
    assert_eq!(public.message, "The username provided is already in use.");
}

#[tokio::test]
async fn lookups_compare_case_insensitively() {
    let pool = test_pool().await;
    let store = user_store(&pool);

    let created = create_user(&store, "CaseSensitive").await;

    let by_username = store.find_one_by_username("casesensitive").await.unwrap();
    assert_eq!(by_username.id, created.id);

    let by_email = store
        .find_one_by_email("CASESENSITIVE@EXAMPLE.COM")
        .await
        .unwrap();
    assert_eq!(by_email.id, created.id);
}

#[tokio::test]
async fn unknown_username_is_not_found() {
    let pool = test_pool().await;
    let store = user_store(&pool);

    let err = store.find_one_by_username("nobody").await.unwrap_err();

    let public = err.to_public();
    assert_eq!(public.name, "NotFoundError");
    assert_eq!(
        public.message,
        "The username provided was not found in the system."
    );
}

#[tokio::test]
async fn update_renames_and_bumps_updated_at() {
    let pool = test_pool().await;
    let store = user_store(&pool);

    let created = create_user(&store, "oldname").await;

    let updated = store
        .update(
            "oldname",
            UserUpdate {
                username: Some("newname".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.username, "newname");
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn update_to_a_taken_username_is_rejected() {
    let pool = test_pool().await;
    let store = user_store(&pool);

    create_user(&store, "user1").await;
    create_user(&store, "user2").await;

    let err = store
        .update(
            "user2",
            UserUpdate {
                username: Some("user1".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.to_public().name, "ValidationError");
}

#[tokio::test]
async fn update_rehashes_a_changed_password() {
    let pool = test_pool().await;
    let store = user_store(&pool);

    let created = create_user(&store, "alice").await;

    let updated = store
        .update(
            "alice",
            UserUpdate {
                password: Some("a-brand-new-password".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_ne!(updated.password, created.password);
    assert_ne!(updated.password, "a-brand-new-password");
}

#[tokio::test]
async fn empty_fields_are_a_validation_error() {
    let pool = test_pool().await;
    let store = user_store(&pool);

    let err = store
        .create(NewUser {
            username: String::new(),
            email: "a@example.com".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_public().name, "ValidationError");
}

#[tokio::test]
async fn add_features_merges_without_duplicates() {
    let pool = test_pool().await;
    let store = user_store(&pool);

    let user = create_user(&store, "alice").await;

    let upgraded = store
        .add_features(
            &user.id,
            &[Capability::CreateSession, Capability::ReadActivationToken],
        )
        .await
        .unwrap();

    assert_eq!(
        upgraded.features,
        vec![Capability::ReadActivationToken, Capability::CreateSession]
    );
}
