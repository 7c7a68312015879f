//! Authentication Flow
//!
//! Credential validation producing an authenticated user. Every failure
//! path (unknown email, wrong password, hash comparison trouble) collapses
//! into one identical Unauthorized payload so callers cannot enumerate
//! accounts. The real cause stays in the server-side log.

use super::PasswordScheme;
use crate::user::{User, UserStore};
use tracing::debug;
use vestibule_core::{VestibuleError, VestibuleResult};

/// Validates credentials against the user store
#[derive(Debug, Clone)]
pub struct Authenticator {
    users: UserStore,
    passwords: PasswordScheme,
}

impl Authenticator {
    pub fn new(users: UserStore, passwords: PasswordScheme) -> Self {
        Self { users, passwords }
    }

    /// Authenticate by email and plaintext password
    pub async fn authenticate(&self, email: &str, password: &str) -> VestibuleResult<User> {
        match self.try_authenticate(email, password).await {
            Ok(user) => Ok(user),
            Err(cause) => {
                debug!(error = %cause, "authentication failed");
                Err(Self::mismatch())
            }
        }
    }

    async fn try_authenticate(&self, email: &str, password: &str) -> VestibuleResult<User> {
        let user = self.users.find_one_by_email(email).await?;

        if !self.passwords.verify(password, &user.password)? {
            return Err(Self::mismatch());
        }

        Ok(user)
    }

    /// The one public outcome of any failed authentication
    fn mismatch() -> VestibuleError {
        VestibuleError::unauthorized(
            "Authentication data does not match.",
            "Check that the submitted data is correct.",
        )
    }
}
