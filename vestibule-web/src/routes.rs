//! API route definitions

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, patch, post},
    Router,
};

/// All versioned API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/users", post(handlers::users::create_user))
        .route(
            "/v1/users/{username}",
            get(handlers::users::get_user).patch(handlers::users::update_user),
        )
        .route(
            "/v1/sessions",
            post(handlers::sessions::create_session).delete(handlers::sessions::delete_session),
        )
        .route(
            "/v1/activations/{token_id}",
            patch(handlers::activations::redeem_activation),
        )
        .route("/v1/status", get(handlers::status::status))
}
