//! Status endpoint
//!
//! Reports the database dependency the way operators expect to read it:
//! engine version, pool ceiling and currently open connections.

use crate::{error::ApiResult, state::AppState};
use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};
use vestibule_core::VestibuleError;

pub async fn status(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let version: String = sqlx::query_scalar("SELECT sqlite_version()")
        .fetch_one(&state.pool)
        .await
        .map_err(|e| {
            VestibuleError::storage("Failed to read database version", Some(Box::new(e)))
        })?;

    Ok(Json(json!({
        "updated_at": Utc::now(),
        "dependencies": {
            "database": {
                "version": version,
                "max_connections": state.pool.options().get_max_connections(),
                "opened_connections": state.pool.size(),
            }
        }
    })))
}
