//! Emergency pause handlers

use crate::api::rest::caller::Caller;
use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{extract::State, Json};
use serde::Serialize;

/// Pause state response
#[derive(Debug, Serialize)]
pub struct PausedResponse {
    pub paused: bool,
}

pub async fn get_paused(State(state): State<AppState>) -> Json<PausedResponse> {
    Json(PausedResponse {
        paused: state.registry.paused(),
    })
}

/// Halt registration
pub async fn pause(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> ApiResult<Json<PausedResponse>> {
    state.registry.pause(caller)?;
    tracing::warn!(caller = %caller, "Registry paused via API");
    Ok(Json(PausedResponse { paused: true }))
}

/// Resume registration
pub async fn unpause(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> ApiResult<Json<PausedResponse>> {
    state.registry.unpause(caller)?;
    tracing::info!(caller = %caller, "Registry unpaused via API");
    Ok(Json(PausedResponse { paused: false }))
}
