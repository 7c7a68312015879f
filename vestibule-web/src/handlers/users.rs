//! User registration and profile handlers

use crate::{
    error::ApiResult,
    middleware::CurrentActor,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use tracing::info;
use vestibule_app::{filter_output, require, require_for, Capability, NewUser, UserUpdate};

/// Register a new user
///
/// Issues an activation token and fires off the activation email before the
/// filtered user crosses the boundary.
pub async fn create_user(
    State(state): State<AppState>,
    current: CurrentActor,
    Json(input): Json<NewUser>,
) -> ApiResult<impl IntoResponse> {
    require(&current.actor, Capability::CreateUser)?;

    let user = state.users.create(input).await?;
    let token = state.activations.issue(&user.id).await?;
    state.activations.send_email_to_user(&user, &token).await;

    info!(username = %user.username, "user signed up");
    Ok((
        StatusCode::CREATED,
        Json(filter_output(&current.actor, Capability::ReadUser, &user)),
    ))
}

/// Read a user profile by username
pub async fn get_user(
    State(state): State<AppState>,
    current: CurrentActor,
    Path(username): Path<String>,
) -> ApiResult<Json<Value>> {
    require(&current.actor, Capability::ReadUser)?;

    let user = state.users.find_one_by_username(&username).await?;

    Ok(Json(filter_output(
        &current.actor,
        Capability::ReadUser,
        &user,
    )))
}

/// Update a user profile
///
/// Self updates need `update:user`; a target other than the actor needs the
/// explicit `update:user:others` tier.
pub async fn update_user(
    State(state): State<AppState>,
    current: CurrentActor,
    Path(username): Path<String>,
    Json(changes): Json<UserUpdate>,
) -> ApiResult<Json<Value>> {
    require(&current.actor, Capability::UpdateUser)?;

    let target = state.users.find_one_by_username(&username).await?;
    require_for(&current.actor, Capability::UpdateUser, &target.id)?;

    let updated = state.users.update(&username, changes).await?;

    Ok(Json(filter_output(
        &current.actor,
        Capability::ReadUser,
        &updated,
    )))
}
