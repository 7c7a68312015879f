//! Application state
//!
//! One state value wires configuration, the connection pool and the domain
//! stores together. Everything here is cheaply cloneable; the pool is the
//! only shared resource.

use sqlx::SqlitePool;
use std::sync::Arc;
use vestibule_app::{
    database, ActivationFlow, Authenticator, Mailer, PasswordScheme, SessionStore, UserStore,
};
use vestibule_core::{AppConfig, VestibuleResult};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: SqlitePool,
    pub users: UserStore,
    pub sessions: SessionStore,
    pub activations: ActivationFlow,
    pub authenticator: Authenticator,
}

impl AppState {
    /// Connect to the configured database and build the full state
    pub async fn new(config: AppConfig, mailer: Arc<dyn Mailer>) -> VestibuleResult<Self> {
        let pool = database::connect(&config.database_url).await?;
        database::prepare_database(&pool).await?;
        Self::with_pool(config, mailer, pool)
    }

    /// Build state over an existing pool (used by tests)
    pub fn with_pool(
        config: AppConfig,
        mailer: Arc<dyn Mailer>,
        pool: SqlitePool,
    ) -> VestibuleResult<Self> {
        let passwords = PasswordScheme::new(&config.password)?;
        let users = UserStore::new(pool.clone(), passwords.clone());

        Ok(Self {
            users: users.clone(),
            sessions: SessionStore::new(pool.clone(), config.session_ttl),
            activations: ActivationFlow::new(
                pool.clone(),
                config.activation_ttl,
                mailer,
                config.origin.clone(),
                config.mail_from.clone(),
            ),
            authenticator: Authenticator::new(users, passwords),
            config: Arc::new(config),
            pool,
        })
    }
}
