//! Role management handlers

use super::agents::Ack;
use crate::api::rest::caller::Caller;
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use autonomix_types::{Principal, Role};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

/// Grant or revoke request
#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: Role,
    pub account: Principal,
}

/// Renounce request; `confirmation` must repeat the caller
#[derive(Debug, Deserialize)]
pub struct RenounceRequest {
    pub role: Role,
    pub confirmation: Principal,
}

pub async fn grant_role(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<RoleRequest>,
) -> ApiResult<Json<Ack>> {
    state
        .registry
        .grant_role(caller, &request.role, request.account)?;
    Ok(Ack::ok())
}

pub async fn revoke_role(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<RoleRequest>,
) -> ApiResult<Json<Ack>> {
    state
        .registry
        .revoke_role(caller, &request.role, request.account)?;
    Ok(Ack::ok())
}

pub async fn renounce_role(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<RenounceRequest>,
) -> ApiResult<Json<Ack>> {
    state
        .registry
        .renounce_role(caller, &request.role, request.confirmation)?;
    Ok(Ack::ok())
}

/// Role membership check
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HasRoleResponse {
    pub role: Role,
    pub account: Principal,
    pub has_role: bool,
    pub admin_role: Role,
}

pub async fn check_role(
    State(state): State<AppState>,
    Path((role, account)): Path<(String, String)>,
) -> ApiResult<Json<HasRoleResponse>> {
    let role = Role::new(role);
    let account: Principal = account
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid account: {}", e)))?;

    Ok(Json(HasRoleResponse {
        has_role: state.registry.has_role(&role, account),
        admin_role: state.registry.get_role_admin(&role),
        role,
        account,
    }))
}

/// Role members
#[derive(Debug, Serialize)]
pub struct RoleMembersResponse {
    pub role: Role,
    pub members: Vec<Principal>,
}

pub async fn role_members(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> Json<RoleMembersResponse> {
    let role = Role::new(role);
    Json(RoleMembersResponse {
        members: state.registry.role_members(&role),
        role,
    })
}
