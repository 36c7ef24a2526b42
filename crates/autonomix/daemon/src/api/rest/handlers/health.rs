//! Health and status handlers

use crate::api::rest::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
    })
}

/// Daemon status response
#[derive(Debug, Serialize)]
pub struct DaemonStatusResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub registry: RegistryStats,
}

/// Registry statistics
#[derive(Debug, Serialize)]
pub struct RegistryStats {
    pub name: String,
    pub symbol: String,
    pub paused: bool,
    pub total_supply: usize,
    pub next_agent_id: u64,
    pub last_event_sequence: u64,
}

/// Daemon status endpoint
pub async fn daemon_status(State(state): State<AppState>) -> Json<DaemonStatusResponse> {
    let registry = &state.registry;

    Json(DaemonStatusResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
        started_at: state.started_at,
        registry: RegistryStats {
            name: registry.name().to_string(),
            symbol: registry.symbol().to_string(),
            paused: registry.paused(),
            total_supply: registry.total_supply(),
            next_agent_id: registry.next_agent_id().get(),
            last_event_sequence: registry.last_event_sequence(),
        },
    })
}
