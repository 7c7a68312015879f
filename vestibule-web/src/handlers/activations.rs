//! Activation redemption handler

use crate::{error::ApiResult, middleware::CurrentActor, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use vestibule_app::{filter_output, require, Capability};

/// Redeem an activation token, upgrading the owning user
pub async fn redeem_activation(
    State(state): State<AppState>,
    current: CurrentActor,
    Path(token_id): Path<String>,
) -> ApiResult<Json<Value>> {
    require(&current.actor, Capability::ReadActivationToken)?;

    let token = state.activations.redeem(&token_id).await?;

    Ok(Json(filter_output(
        &current.actor,
        Capability::ReadActivationToken,
        &token,
    )))
}
