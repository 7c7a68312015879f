//! Login and logout handlers

use crate::{
    error::{ApiError, ApiResult},
    middleware::{clear_session_cookie, no_active_session, session_cookie, CurrentActor},
    state::AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::info;
use vestibule_app::{can, filter_output, require, Capability};
use vestibule_core::VestibuleError;

/// Login credentials
#[derive(Debug, Deserialize)]
pub struct SessionCredentials {
    pub email: String,
    pub password: String,
}

/// Authenticate and mint a session
///
/// The anonymous actor holds `create:session`, so the gate here is about the
/// authenticated account: an unactivated user authenticates fine and is then
/// refused for lacking the capability.
pub async fn create_session(
    State(state): State<AppState>,
    jar: CookieJar,
    current: CurrentActor,
    Json(credentials): Json<SessionCredentials>,
) -> ApiResult<impl IntoResponse> {
    require(&current.actor, Capability::CreateSession)?;

    let user = state
        .authenticator
        .authenticate(&credentials.email, &credentials.password)
        .await?;

    let actor = user.to_actor();
    if !can(&actor, Capability::CreateSession) {
        return Err(ApiError(VestibuleError::forbidden(
            "You do not have permission to log in.",
            "Contact support if you believe this is an error.",
        )));
    }

    let session = state.sessions.create(&user.id).await?;
    let jar = jar.add(session_cookie(
        &session.token,
        state.config.session_ttl,
        state.config.environment.is_production(),
    ));

    info!(username = %user.username, "user logged in");
    Ok((
        StatusCode::CREATED,
        jar,
        Json(filter_output(&actor, Capability::ReadSession, &session)),
    ))
}

/// Revoke the session named by the cookie
pub async fn delete_session(
    State(state): State<AppState>,
    jar: CookieJar,
    current: CurrentActor,
) -> ApiResult<impl IntoResponse> {
    let session = current.session.ok_or(ApiError(no_active_session()))?;

    let expired = state.sessions.expire_by_id(&session.id).await?;
    let jar = jar.add(clear_session_cookie(
        state.config.environment.is_production(),
    ));

    info!(session_id = %expired.id, "user logged out");
    Ok((
        jar,
        Json(filter_output(
            &current.actor,
            Capability::ReadSession,
            &expired,
        )),
    ))
}
