//! Owner-centric reads and operator approvals

use crate::api::rest::caller::Caller;
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use autonomix_types::Principal;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

fn parse_principal(raw: &str) -> ApiResult<Principal> {
    raw.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid principal {}: {}", raw, e)))
}

/// Balance response
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub owner: Principal,
    pub balance: usize,
}

pub async fn owner_balance(
    State(state): State<AppState>,
    Path(owner): Path<String>,
) -> ApiResult<Json<BalanceResponse>> {
    let owner = parse_principal(&owner)?;
    let balance = state.registry.balance_of(owner)?;
    Ok(Json(BalanceResponse { owner, balance }))
}

/// Owned tokens response
#[derive(Debug, Serialize)]
pub struct OwnedAgentsResponse {
    pub owner: Principal,
    pub agents: Vec<u64>,
}

pub async fn owner_agents(
    State(state): State<AppState>,
    Path(owner): Path<String>,
) -> ApiResult<Json<OwnedAgentsResponse>> {
    let owner = parse_principal(&owner)?;
    let agents = state
        .registry
        .tokens_of(owner)
        .into_iter()
        .map(|id| id.get())
        .collect();
    Ok(Json(OwnedAgentsResponse { owner, agents }))
}

/// Operator approval request
#[derive(Debug, Deserialize)]
pub struct OperatorRequest {
    pub operator: Principal,
    pub approved: bool,
}

/// Operator approval state
#[derive(Debug, Serialize)]
pub struct OperatorResponse {
    pub owner: Principal,
    pub operator: Principal,
    pub approved: bool,
}

/// Approve or revoke an operator for all of the caller's tokens
pub async fn set_operator(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<OperatorRequest>,
) -> ApiResult<Json<OperatorResponse>> {
    state
        .registry
        .set_approval_for_all(caller, request.operator, request.approved)?;
    Ok(Json(OperatorResponse {
        owner: caller,
        operator: request.operator,
        approved: request.approved,
    }))
}

pub async fn get_operator(
    State(state): State<AppState>,
    Path((owner, operator)): Path<(String, String)>,
) -> ApiResult<Json<OperatorResponse>> {
    let owner = parse_principal(&owner)?;
    let operator = parse_principal(&operator)?;
    Ok(Json(OperatorResponse {
        owner,
        operator,
        approved: state.registry.is_approved_for_all(owner, operator),
    }))
}
