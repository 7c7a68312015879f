//! HTTP error mapping
//!
//! Every handler error carries the public payload from the core taxonomy.
//! The response body is exactly that payload; nothing else crosses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use vestibule_core::VestibuleError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Wrapper giving core errors an HTTP representation
#[derive(Debug)]
pub struct ApiError(pub VestibuleError);

impl From<VestibuleError> for ApiError {
    fn from(err: VestibuleError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let public = self.0.to_public();
        let status = StatusCode::from_u16(public.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(public)).into_response()
    }
}
