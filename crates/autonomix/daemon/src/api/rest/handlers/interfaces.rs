//! Capability introspection handlers

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use autonomix_registry::supported_interfaces;
use autonomix_types::InterfaceId;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

/// Supported operation set
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceInfo {
    pub name: String,
    pub version: u32,
    pub interface_id: InterfaceId,
    pub signatures: Vec<String>,
}

pub async fn list_interfaces() -> Json<Vec<InterfaceInfo>> {
    let infos = supported_interfaces()
        .into_iter()
        .map(|(spec, id)| InterfaceInfo {
            name: spec.name.to_string(),
            version: spec.version,
            interface_id: id,
            signatures: spec.signatures.iter().map(|s| s.to_string()).collect(),
        })
        .collect();
    Json(infos)
}

/// `supportsInterface` result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportsInterfaceResponse {
    pub interface_id: InterfaceId,
    pub supported: bool,
}

pub async fn supports_interface(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SupportsInterfaceResponse>> {
    let interface_id: InterfaceId = id
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid interface id: {}", e)))?;

    Ok(Json(SupportsInterfaceResponse {
        interface_id,
        supported: state.registry.supports_interface(interface_id),
    }))
}
