//! Actor injection and cookie transport
//!
//! Every request resolves to an actor before its handler runs: a valid
//! `session_id` cookie yields the session's user (renewing the session's
//! sliding window), anything else yields the synthetic anonymous actor.
//! Unauthorized responses leave with the cookie cleared.

use crate::{error::ApiError, state::AppState};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Duration;
use tracing::debug;
use vestibule_app::{Actor, Session};
use vestibule_core::VestibuleError;

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "session_id";

/// The resolved requester, anonymous or session-backed
pub struct CurrentActor {
    pub actor: Actor,
    /// The renewed session, when the actor came from a valid cookie
    pub session: Option<Session>,
}

impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(Self {
                actor: Actor::anonymous(),
                session: None,
            });
        };

        let session = state
            .sessions
            .find_valid_by_token(cookie.value())
            .await
            .map_err(reject_session)?;

        let user = state
            .users
            .find_one_by_id(&session.user_id)
            .await
            .map_err(reject_session)?;

        debug!(user = %user.username, "resolved session actor");
        Ok(Self {
            actor: user.to_actor(),
            session: Some(session),
        })
    }
}

/// Collapse any session resolution failure into the one Unauthorized outcome
///
/// Storage trouble stays a storage error; a missing, expired or dangling
/// session all read the same from outside.
fn reject_session(err: VestibuleError) -> ApiError {
    match err {
        VestibuleError::NotFound { .. } => ApiError(no_active_session()),
        other => ApiError(other),
    }
}

/// The public error for requests without a usable session
pub fn no_active_session() -> VestibuleError {
    VestibuleError::unauthorized(
        "User does not have an active session.",
        "Check that this user is logged in and try again.",
    )
}

/// Session cookie with the configured TTL
pub fn session_cookie(token: &str, ttl: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .build()
}

/// Replacement cookie that immediately invalidates the stored value
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "invalid"))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(-1))
        .build()
}

/// Clear the session cookie on every Unauthorized response
pub async fn clear_session_on_unauthorized(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if response.status() == StatusCode::UNAUTHORIZED {
        let jar = CookieJar::new().add(clear_session_cookie(
            state.config.environment.is_production(),
        ));
        return (jar, response).into_response();
    }

    response
}
