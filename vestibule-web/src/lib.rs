//! Vestibule Web Server
//!
//! HTTP boundary over the Vestibule application core: registration,
//! activation, authentication and profile routes.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::Router;
use tower_http::trace::TraceLayer;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes())
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::clear_session_on_unauthorized,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize logging for the web server
pub fn init_logging() {
    vestibule_core::init_logging("vestibule_web=debug,vestibule_app=debug,tower_http=debug");
}
