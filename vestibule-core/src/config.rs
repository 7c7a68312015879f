//! Application configuration
//!
//! Configuration is loaded once at startup and threaded into the stores and
//! flows at construction time. Nothing deeper in the call graph reads the
//! process environment.

use crate::error::{VestibuleError, VestibuleResult};
use chrono::Duration;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

/// Password hashing configuration
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// Server-side secret mixed into every password before the adaptive hash
    pub pepper: String,
    /// Use minimal argon2 cost parameters (test/dev only)
    pub minimal_cost: bool,
}

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database URL
    pub database_url: String,
    /// Public origin used when building activation links
    pub origin: String,
    /// Sender address for outgoing mail
    pub mail_from: String,
    /// Password hashing settings
    pub password: PasswordConfig,
    /// Session validity window, renewed on every valid use
    pub session_ttl: Duration,
    /// Activation token validity window
    pub activation_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: Environment::Development,
            database_url: "sqlite:vestibule.db".to_string(),
            origin: "http://localhost:8080".to_string(),
            mail_from: "Vestibule <contact@vestibule.local>".to_string(),
            password: PasswordConfig {
                pepper: String::new(),
                minimal_cost: true,
            },
            session_ttl: Duration::minutes(15),
            activation_ttl: Duration::minutes(15),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> VestibuleResult<Self> {
        let environment = std::env::var("VESTIBULE_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .parse()
            .unwrap_or(Environment::Development);

        let pepper = std::env::var("PASSWORD_PEPPER").unwrap_or_default();

        let config = Self {
            host: std::env::var("VESTIBULE_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("VESTIBULE_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            environment,
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:vestibule.db".to_string()),
            origin: std::env::var("VESTIBULE_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            mail_from: std::env::var("VESTIBULE_MAIL_FROM")
                .unwrap_or_else(|_| "Vestibule <contact@vestibule.local>".to_string()),
            password: PasswordConfig {
                pepper,
                minimal_cost: !environment.is_production(),
            },
            session_ttl: Duration::minutes(15),
            activation_ttl: Duration::minutes(15),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// A missing pepper is an environment misconfiguration, fatal at startup
    /// rather than surfaced per request.
    pub fn validate(&self) -> VestibuleResult<()> {
        if self.password.pepper.is_empty() {
            return Err(VestibuleError::configuration(
                "The 'PASSWORD_PEPPER' environment variable is not created or configured correctly.",
                "Check that this variable is created and configured on your system.",
            ));
        }

        if self.session_ttl <= Duration::zero() {
            return Err(VestibuleError::configuration(
                "Session TTL must be a positive duration.",
                "Set the session TTL to a positive number of minutes.",
            ));
        }

        Ok(())
    }

    /// Get the server bind address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
