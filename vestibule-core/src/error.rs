//! Unified error handling system
//!
//! Domain errors carry a public message and a suggested action; both travel
//! verbatim to the HTTP boundary. Storage and internal failures are logged
//! server-side and collapse to a generic public payload.

use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub type VestibuleResult<T> = Result<T, VestibuleError>;

/// Main error type for the Vestibule system
#[derive(Error, Debug)]
pub enum VestibuleError {
    #[error("Validation error: {message}")]
    Validation { message: String, action: String },

    #[error("Not found: {message}")]
    NotFound { message: String, action: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String, action: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String, action: String },

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Configuration error: {message}")]
    Configuration { message: String, action: String },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// The JSON body every error presents at the system boundary
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicError {
    pub name: String,
    pub message: String,
    pub action: String,
    pub status_code: u16,
}

impl VestibuleError {
    pub fn validation<M: Into<String>, A: Into<String>>(message: M, action: A) -> Self {
        Self::Validation {
            message: message.into(),
            action: action.into(),
        }
    }

    pub fn not_found<M: Into<String>, A: Into<String>>(message: M, action: A) -> Self {
        Self::NotFound {
            message: message.into(),
            action: action.into(),
        }
    }

    pub fn unauthorized<M: Into<String>, A: Into<String>>(message: M, action: A) -> Self {
        Self::Unauthorized {
            message: message.into(),
            action: action.into(),
        }
    }

    pub fn forbidden<M: Into<String>, A: Into<String>>(message: M, action: A) -> Self {
        Self::Forbidden {
            message: message.into(),
            action: action.into(),
        }
    }

    pub fn configuration<M: Into<String>, A: Into<String>>(message: M, action: A) -> Self {
        Self::Configuration {
            message: message.into(),
            action: action.into(),
        }
    }

    pub fn storage<M: Into<String>>(
        message: M,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            source,
        }
    }

    pub fn internal<M: Into<String>>(
        message: M,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source,
        }
    }

    /// Stable public name of the error kind
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "ValidationError",
            Self::NotFound { .. } => "NotFoundError",
            Self::Unauthorized { .. } => "UnauthorizedError",
            Self::Forbidden { .. } => "ForbiddenError",
            Self::MethodNotAllowed => "MethodNotAllowedError",
            Self::Configuration { .. } => "ConfigurationError",
            Self::Storage { .. } | Self::Internal { .. } => "InternalServerError",
        }
    }

    /// HTTP status this error maps to at the boundary
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Unauthorized { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::MethodNotAllowed => 405,
            Self::Configuration { .. } | Self::Storage { .. } | Self::Internal { .. } => 500,
        }
    }

    /// Whether the boundary must clear the session cookie when emitting this error
    pub fn clears_session(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Build the payload that crosses the system boundary.
    ///
    /// Domain errors expose their message and action verbatim. Storage and
    /// internal errors are logged here and replaced by a generic payload so
    /// no cause detail leaks to the caller.
    pub fn to_public(&self) -> PublicError {
        let (message, action) = match self {
            Self::Validation { message, action }
            | Self::NotFound { message, action }
            | Self::Unauthorized { message, action }
            | Self::Forbidden { message, action }
            | Self::Configuration { message, action } => (message.clone(), action.clone()),
            Self::MethodNotAllowed => (
                "Method not allowed for this endpoint.".to_string(),
                "Check that the HTTP method sent is valid for this endpoint.".to_string(),
            ),
            Self::Storage { .. } | Self::Internal { .. } => {
                error!(error = %self, source = ?std::error::Error::source(self), "internal error crossed the boundary");
                (
                    "An unexpected internal error occurred.".to_string(),
                    "Contact support.".to_string(),
                )
            }
        };

        PublicError {
            name: self.name().to_string(),
            message,
            action,
            status_code: self.status_code(),
        }
    }
}
