//! User entity and store
//!
//! Username and email are unique under case-insensitive comparison. The
//! pre-checks here are advisory for friendlier messages; the database's
//! unique constraints are the actual guarantee, and a race surfaces as the
//! same validation error rather than a crash.

use crate::auth::{Actor, Capability, PasswordScheme};
use crate::database::{is_unique_violation, storage_error};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteConnection;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;
use vestibule_core::{VestibuleError, VestibuleResult};

/// A persisted user account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Salted and peppered hash, never the plaintext
    #[serde(skip_serializing)]
    pub password: String,
    pub features: Vec<Capability>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn to_actor(&self) -> Actor {
        Actor::registered(self.id.clone(), self.username.clone(), self.features.clone())
    }
}

/// Registration input
#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Partial profile update; absent fields are left untouched
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Database row shape for users
#[derive(Debug, sqlx::FromRow)]
struct UserRecord {
    id: String,
    username: String,
    email: String,
    password: String,
    features: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRecord {
    fn into_user(self) -> VestibuleResult<User> {
        let features: Vec<Capability> = serde_json::from_str(&self.features).map_err(|e| {
            VestibuleError::internal("Stored feature list is malformed", Some(Box::new(e)))
        })?;

        Ok(User {
            id: self.id,
            username: self.username,
            email: self.email,
            password: self.password,
            features,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn encode_features(features: &[Capability]) -> VestibuleResult<String> {
    serde_json::to_string(features)
        .map_err(|e| VestibuleError::internal("Failed to encode feature list", Some(Box::new(e))))
}

fn duplicate_email() -> VestibuleError {
    VestibuleError::validation(
        "The email provided is already in use.",
        "Use another email for this operation.",
    )
}

fn duplicate_username() -> VestibuleError {
    VestibuleError::validation(
        "The username provided is already in use.",
        "Use another username for this operation.",
    )
}

/// Map an insert/update failure, turning the store's unique violation into
/// the same public validation error the advisory pre-check produces
fn map_write_error(err: sqlx::Error) -> VestibuleError {
    if is_unique_violation(&err) {
        if let sqlx::Error::Database(db) = &err {
            let message = db.message().to_string();
            if message.contains("users.email") {
                return duplicate_email();
            }
            if message.contains("users.username") {
                return duplicate_username();
            }
        }
    }

    storage_error(err)
}

/// Database-backed user store
#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
    passwords: PasswordScheme,
}

impl UserStore {
    pub fn new(pool: SqlitePool, passwords: PasswordScheme) -> Self {
        Self { pool, passwords }
    }

    /// Register a new user with the default unactivated feature set
    pub async fn create(&self, input: NewUser) -> VestibuleResult<User> {
        if input.username.is_empty() || input.email.is_empty() || input.password.is_empty() {
            return Err(VestibuleError::validation(
                "Username, email and password are required.",
                "Fill in all required fields and try again.",
            ));
        }

        self.validate_unique_email(&input.email).await?;
        self.validate_unique_username(&input.username).await?;

        let password_hash = self.passwords.hash(&input.password)?;
        let features = encode_features(&Capability::new_user_features())?;
        let now = Utc::now();

        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, username, email, password, features, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&input.username)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(&features)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        info!(username = %record.username, "registered new user");
        record.into_user()
    }

    pub async fn find_one_by_id(&self, id: &str) -> VestibuleResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT * FROM users WHERE id = ? LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        record
            .ok_or_else(|| {
                VestibuleError::not_found(
                    "The id provided was not found in the system.",
                    "Check that the id is typed correctly.",
                )
            })?
            .into_user()
    }

    pub async fn find_one_by_username(&self, username: &str) -> VestibuleResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT * FROM users WHERE LOWER(username) = LOWER(?) LIMIT 1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        record
            .ok_or_else(|| {
                VestibuleError::not_found(
                    "The username provided was not found in the system.",
                    "Check that the username is typed correctly.",
                )
            })?
            .into_user()
    }

    pub async fn find_one_by_email(&self, email: &str) -> VestibuleResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT * FROM users WHERE LOWER(email) = LOWER(?) LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        record
            .ok_or_else(|| {
                VestibuleError::not_found(
                    "The email provided was not found in the system.",
                    "Check that the email is typed correctly.",
                )
            })?
            .into_user()
    }

    /// Apply a partial update to the user named by `username`
    ///
    /// Changed unique fields are re-validated and a changed password is
    /// re-hashed before the row is rewritten.
    pub async fn update(&self, username: &str, changes: UserUpdate) -> VestibuleResult<User> {
        let current = self.find_one_by_username(username).await?;

        if let Some(email) = &changes.email {
            self.validate_unique_email(email).await?;
        }

        if let Some(new_username) = &changes.username {
            self.validate_unique_username(new_username).await?;
        }

        let password = match &changes.password {
            Some(plaintext) => self.passwords.hash(plaintext)?,
            None => current.password.clone(),
        };

        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
            SET username = ?, email = ?, password = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(changes.username.as_deref().unwrap_or(&current.username))
        .bind(changes.email.as_deref().unwrap_or(&current.email))
        .bind(&password)
        .bind(Utc::now())
        .bind(&current.id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        debug!(user_id = %current.id, "updated user");
        record.into_user()
    }

    /// Merge extra features into a user's feature list
    pub async fn add_features(&self, user_id: &str, features: &[Capability]) -> VestibuleResult<User> {
        let mut conn = self.pool.acquire().await.map_err(storage_error)?;
        Self::add_features_on(&mut conn, user_id, features).await
    }

    /// Transaction-scoped variant of [`add_features`](Self::add_features)
    ///
    /// Used by activation redemption, which must commit the feature upgrade
    /// and the token consumption together.
    pub async fn add_features_on(
        conn: &mut SqliteConnection,
        user_id: &str,
        features: &[Capability],
    ) -> VestibuleResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT * FROM users WHERE id = ? LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(storage_error)?;

        let user = record
            .ok_or_else(|| {
                VestibuleError::not_found(
                    "The id provided was not found in the system.",
                    "Check that the id is typed correctly.",
                )
            })?
            .into_user()?;

        let mut merged = user.features.clone();
        for feature in features {
            if !merged.contains(feature) {
                merged.push(*feature);
            }
        }

        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
            SET features = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(encode_features(&merged)?)
        .bind(Utc::now())
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(storage_error)?;

        record.into_user()
    }

    async fn validate_unique_email(&self, email: &str) -> VestibuleResult<()> {
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE LOWER(email) = LOWER(?)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        if existing > 0 {
            return Err(duplicate_email());
        }

        Ok(())
    }

    async fn validate_unique_username(&self, username: &str) -> VestibuleResult<()> {
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE LOWER(username) = LOWER(?)",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        if existing > 0 {
            return Err(duplicate_username());
        }

        Ok(())
    }
}
