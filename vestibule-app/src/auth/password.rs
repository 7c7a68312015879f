//! Password hashing
//!
//! Two-stage scheme: an HMAC-SHA256 pepper keyed with a server-side secret,
//! followed by argon2 with a per-hash salt. Cost parameters come from
//! configuration; test and development runs use minimal cost so suites stay
//! fast.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use vestibule_core::{PasswordConfig, VestibuleError, VestibuleResult};

type HmacSha256 = Hmac<Sha256>;

/// Password hashing and verification with a configured pepper
#[derive(Debug, Clone)]
pub struct PasswordScheme {
    pepper: String,
    minimal_cost: bool,
}

impl PasswordScheme {
    /// Build a scheme from validated configuration
    pub fn new(config: &PasswordConfig) -> VestibuleResult<Self> {
        if config.pepper.is_empty() {
            return Err(VestibuleError::configuration(
                "The 'PASSWORD_PEPPER' environment variable is not created or configured correctly.",
                "Check that this variable is created and configured on your system.",
            ));
        }

        Ok(Self {
            pepper: config.pepper.clone(),
            minimal_cost: config.minimal_cost,
        })
    }

    /// Hash a plaintext password for storage
    pub fn hash(&self, password: &str) -> VestibuleResult<String> {
        let peppered = self.peppered(password)?;
        let salt = SaltString::generate(&mut OsRng);

        self.hasher()?
            .hash_password(peppered.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| VestibuleError::internal("Failed to hash password", Some(Box::new(e))))
    }

    /// Verify a plaintext password against a stored hash
    ///
    /// A malformed stored hash is an error, not a mismatch; callers in the
    /// authentication flow collapse both outcomes anyway.
    pub fn verify(&self, password: &str, stored: &str) -> VestibuleResult<bool> {
        let peppered = self.peppered(password)?;
        let parsed = PasswordHash::new(stored).map_err(|e| {
            VestibuleError::internal("Stored password hash is malformed", Some(Box::new(e)))
        })?;

        Ok(Argon2::default()
            .verify_password(peppered.as_bytes(), &parsed)
            .is_ok())
    }

    /// Apply the server-side pepper before the adaptive hash
    fn peppered(&self, password: &str) -> VestibuleResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.pepper.as_bytes()).map_err(|e| {
            VestibuleError::internal("Failed to key the password pepper", Some(Box::new(e)))
        })?;
        mac.update(password.as_bytes());

        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }

    fn hasher(&self) -> VestibuleResult<Argon2<'static>> {
        if self.minimal_cost {
            let params = Params::new(1024, 1, 1, None).map_err(|e| {
                VestibuleError::internal("Invalid argon2 parameters", Some(Box::new(e)))
            })?;
            Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
        } else {
            Ok(Argon2::default())
        }
    }
}
