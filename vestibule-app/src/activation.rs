//! Activation flow
//!
//! Time-bound, single-use activation tokens. Redemption upgrades the owning
//! user's feature set and consumes the token in one transaction; a second
//! redemption, an expired token and an unknown token are indistinguishable
//! to the caller.

use crate::auth::Capability;
use crate::database::storage_error;
use crate::mailer::{Mail, Mailer};
use crate::user::{User, UserStore};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use vestibule_core::{VestibuleError, VestibuleResult};

/// A persisted activation token
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ActivationToken {
    pub id: String,
    pub user_id: String,
    pub used_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Issues, delivers and redeems activation tokens
#[derive(Clone)]
pub struct ActivationFlow {
    pool: SqlitePool,
    ttl: Duration,
    mailer: Arc<dyn Mailer>,
    origin: String,
    mail_from: String,
}

impl ActivationFlow {
    pub fn new(
        pool: SqlitePool,
        ttl: Duration,
        mailer: Arc<dyn Mailer>,
        origin: String,
        mail_from: String,
    ) -> Self {
        Self {
            pool,
            ttl,
            mailer,
            origin,
            mail_from,
        }
    }

    /// Create a fresh activation token for a user
    ///
    /// Callers must not issue duplicates for the same signup; one valid
    /// token per user is the expected state.
    pub async fn issue(&self, user_id: &str) -> VestibuleResult<ActivationToken> {
        let now = Utc::now();

        let token = sqlx::query_as::<_, ActivationToken>(
            r#"
            INSERT INTO user_activation_tokens (id, user_id, expires_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(now + self.ttl)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        info!(user_id = %token.user_id, token_id = %token.id, "issued activation token");
        Ok(token)
    }

    /// Latest token issued for a user, if any
    pub async fn find_one_by_user_id(&self, user_id: &str) -> VestibuleResult<Option<ActivationToken>> {
        sqlx::query_as::<_, ActivationToken>(
            r#"
            SELECT * FROM user_activation_tokens
            WHERE user_id = ?
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)
    }

    /// Redeem a token, activating the owning user
    ///
    /// The feature upgrade and the `used_at` write commit together; the
    /// token is never consumed without the upgrade landing.
    pub async fn redeem(&self, token_id: &str) -> VestibuleResult<ActivationToken> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let token = sqlx::query_as::<_, ActivationToken>(
            r#"
            SELECT * FROM user_activation_tokens
            WHERE id = ? AND used_at IS NULL AND expires_at > ?
            LIMIT 1
            "#,
        )
        .bind(token_id)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_error)?
        .ok_or_else(invalid_token)?;

        UserStore::add_features_on(&mut *tx, &token.user_id, &Capability::activation_grant())
            .await?;

        let redeemed = sqlx::query_as::<_, ActivationToken>(
            r#"
            UPDATE user_activation_tokens
            SET used_at = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(token_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;

        info!(user_id = %redeemed.user_id, token_id = %redeemed.id, "activated user");
        Ok(redeemed)
    }

    /// Deliver the activation link to the user
    ///
    /// Fire-and-forget: a delivery failure is logged, not retried, and does
    /// not fail the signup.
    pub async fn send_email_to_user(&self, user: &User, token: &ActivationToken) {
        let mail = Mail {
            from: self.mail_from.clone(),
            to: user.email.clone(),
            subject: "Activate your account!".to_string(),
            body: format!(
                "{username}, click the link below to activate your account:\n\n\
                 {origin}/signup/activate/{token_id}\n\n\
                 Regards,\nThe Vestibule Team",
                username = user.username,
                origin = self.origin,
                token_id = token.id,
            ),
        };

        if let Err(err) = self.mailer.send(mail).await {
            warn!(user_id = %user.id, error = %err, "failed to deliver activation email");
        }
    }
}

/// The one public outcome for missing, expired and already-used tokens
fn invalid_token() -> VestibuleError {
    VestibuleError::not_found(
        "The activation token was not found in the system or has expired.",
        "Sign up again to receive a new activation token.",
    )
}
