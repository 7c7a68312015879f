//! Session store
//!
//! Token-based sessions with a sliding expiration window. The token is a
//! high-entropy secret unrelated to the row id. At most one session row is
//! valid per token: validity is a single predicate (unexpired) applied
//! identically by lookup and renewal, and revocation rewrites the expiry
//! into the past.

use crate::database::{is_foreign_key_violation, storage_error};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;
use vestibule_core::{VestibuleError, VestibuleResult};

const TOKEN_BYTES: usize = 48;

/// A persisted session
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Session {
    pub id: String,
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database-backed session store
#[derive(Debug, Clone)]
pub struct SessionStore {
    pool: SqlitePool,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(pool: SqlitePool, ttl: Duration) -> Self {
        Self { pool, ttl }
    }

    /// Mint a session for a user
    pub async fn create(&self, user_id: &str) -> VestibuleResult<Session> {
        let now = Utc::now();

        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, token, user_id, expires_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(generate_token())
        .bind(user_id)
        .bind(now + self.ttl)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                VestibuleError::storage("Session insert referenced an unknown user", Some(Box::new(e)))
            } else {
                storage_error(e)
            }
        })?;

        info!(user_id = %session.user_id, session_id = %session.id, "created session");
        Ok(session)
    }

    /// Look up a session by token, renewing its expiry on success
    ///
    /// The renewal and the validity check are one statement, so a valid
    /// lookup atomically extends the window by the full TTL. A miss does not
    /// say whether the token never existed or merely expired.
    pub async fn find_valid_by_token(&self, token: &str) -> VestibuleResult<Session> {
        let now = Utc::now();

        let session = sqlx::query_as::<_, Session>(
            r#"
            UPDATE sessions
            SET expires_at = ?, updated_at = ?
            WHERE token = ? AND expires_at > ?
            RETURNING *
            "#,
        )
        .bind(now + self.ttl)
        .bind(now)
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        session.ok_or_else(|| {
            VestibuleError::not_found(
                "The session was not found in the system or has expired.",
                "Log in again to continue.",
            )
        })
    }

    /// Immediately revoke a session by rewriting its expiry into the past
    ///
    /// Idempotent against rows that are already expired.
    pub async fn expire_by_id(&self, id: &str) -> VestibuleResult<Session> {
        let now = Utc::now();

        let session = sqlx::query_as::<_, Session>(
            r#"
            UPDATE sessions
            SET expires_at = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(now - self.ttl)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        let session = session.ok_or_else(|| {
            VestibuleError::not_found(
                "The session was not found in the system or has expired.",
                "Log in again to continue.",
            )
        })?;

        debug!(session_id = %session.id, "expired session");
        Ok(session)
    }
}

/// Cryptographically random session token, unrelated to the row id
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
