//! Shared helpers for store-level integration tests

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use vestibule_app::{
    database, ActivationFlow, Authenticator, MemoryMailer, NewUser, PasswordScheme, SessionStore,
    User, UserStore,
};
use vestibule_core::PasswordConfig;

/// In-memory database shared by a single connection so every query sees the
/// same data
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    database::prepare_database(&pool).await.unwrap();
    pool
}

pub fn password_scheme() -> PasswordScheme {
    PasswordScheme::new(&PasswordConfig {
        pepper: "integration-test-pepper".to_string(),
        minimal_cost: true,
    })
    .unwrap()
}

pub fn user_store(pool: &SqlitePool) -> UserStore {
    UserStore::new(pool.clone(), password_scheme())
}

pub fn session_store(pool: &SqlitePool) -> SessionStore {
    SessionStore::new(pool.clone(), chrono::Duration::minutes(15))
}

pub fn activation_flow(pool: &SqlitePool) -> (ActivationFlow, MemoryMailer) {
    let mailer = MemoryMailer::new();
    let flow = ActivationFlow::new(
        pool.clone(),
        chrono::Duration::minutes(15),
        std::sync::Arc::new(mailer.clone()),
        "http://localhost:8080".to_string(),
        "Vestibule <contact@vestibule.local>".to_string(),
    );
    (flow, mailer)
}

pub fn authenticator(pool: &SqlitePool) -> Authenticator {
    Authenticator::new(user_store(pool), password_scheme())
}

pub async fn create_user(store: &UserStore, username: &str) -> User {
    store
        .create(NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username.to_lowercase()),
            password: "a-valid-password".to_string(),
        })
        .await
        .unwrap()
}
