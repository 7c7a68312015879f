//! Route handlers
//!
//! Thin glue over the application core: resolve the actor, check the gate,
//! call the flow, filter the output.

pub mod activations;
pub mod sessions;
pub mod status;
pub mod users;

use crate::error::ApiError;
use vestibule_core::VestibuleError;

/// Fallback for known paths hit with an unsupported method
pub async fn method_not_allowed() -> ApiError {
    ApiError(VestibuleError::MethodNotAllowed)
}
