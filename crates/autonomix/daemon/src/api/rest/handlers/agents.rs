//! Agent token handlers

use crate::api::rest::caller::Caller;
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use autonomix_types::{AgentId, AgentRecord, Principal, ReputationDelta};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Agent record with resolved display metadata
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDetails {
    pub id: u64,
    pub owner: Principal,
    pub endpoint: String,
    #[serde(rename = "metadataURI")]
    pub metadata_uri: String,
    /// Decimal string; 128-bit scores do not fit JSON numbers
    pub reputation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "imageDataURI", skip_serializing_if = "Option::is_none")]
    pub image_data_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Value>>,
}

impl From<&AgentRecord> for AgentDetails {
    fn from(record: &AgentRecord) -> Self {
        Self {
            id: record.id.get(),
            owner: record.owner,
            endpoint: record.endpoint.clone(),
            metadata_uri: record.metadata_uri.clone(),
            reputation: record.reputation.to_string(),
            name: None,
            description: None,
            image_data_uri: None,
            attributes: None,
        }
    }
}

async fn describe(state: &AppState, record: &AgentRecord, resolve: bool) -> AgentDetails {
    let mut details = AgentDetails::from(record);
    if resolve {
        let summary = state.resolver.summarize(&record.metadata_uri).await;
        details.name = summary.name;
        details.description = summary.description;
        details.image_data_uri = Some(summary.image_data_uri);
        details.attributes = summary.attributes;
    }
    details
}

pub(crate) fn parse_agent_id(raw: &str) -> ApiResult<AgentId> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid agent id: {}", raw)))
}

/// Resolve-metadata switch shared by read routes
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    #[serde(default = "default_resolve")]
    pub resolve: bool,
}

fn default_resolve() -> bool {
    true
}

/// Agent listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAgentsResponse {
    pub next_id: String,
    pub total_supply: String,
    pub count: usize,
    pub items: Vec<AgentDetails>,
}

/// List live agents in id order
pub async fn list_agents(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> ApiResult<Json<ListAgentsResponse>> {
    let next_id = state.registry.next_agent_id();
    let total_supply = state.registry.total_supply();
    let records = state.registry.list_agents();

    let mut items = Vec::with_capacity(records.len());
    for record in &records {
        items.push(describe(&state, record, query.resolve).await);
    }

    Ok(Json(ListAgentsResponse {
        next_id: next_id.to_string(),
        total_supply: total_supply.to_string(),
        count: items.len(),
        items,
    }))
}

/// Get one agent with resolved metadata
pub async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ResolveQuery>,
) -> ApiResult<Json<AgentDetails>> {
    let agent_id = parse_agent_id(&id)?;
    let record = state.registry.agent_record(agent_id)?;
    Ok(Json(describe(&state, &record, query.resolve).await))
}

/// Raw metadata document response
#[derive(Debug, Serialize)]
pub struct AgentMetadataResponse {
    #[serde(rename = "metadataURI")]
    pub metadata_uri: String,
    pub metadata: Value,
}

/// Fetch the full metadata document of an agent
pub async fn get_agent_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AgentMetadataResponse>> {
    let agent_id = parse_agent_id(&id)?;
    let metadata_uri = state.registry.agent_metadata_uri(agent_id)?;
    let metadata = state
        .resolver
        .load_metadata(&metadata_uri)
        .await
        .ok_or_else(|| ApiError::BadGateway("Failed to load metadata".to_string()))?;

    Ok(Json(AgentMetadataResponse {
        metadata_uri,
        metadata,
    }))
}

/// Register agent request
#[derive(Debug, Deserialize)]
pub struct RegisterAgentRequest {
    /// Recipient; defaults to the caller
    #[serde(default)]
    pub to: Option<Principal>,
    pub endpoint: String,
    #[serde(rename = "metadataURI")]
    pub metadata_uri: String,
}

/// Register agent response
#[derive(Debug, Serialize)]
pub struct RegisterAgentResponse {
    pub id: u64,
    pub owner: Principal,
}

/// Mint a new agent token
pub async fn register_agent(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<RegisterAgentRequest>,
) -> ApiResult<Json<RegisterAgentResponse>> {
    let to = request.to.unwrap_or(caller);
    let id = state
        .registry
        .register_agent(caller, to, request.endpoint, request.metadata_uri)?;

    tracing::info!(agent_id = %id, owner = %to, "Registered agent via API");

    Ok(Json(RegisterAgentResponse {
        id: id.get(),
        owner: to,
    }))
}

/// Set metadata request
#[derive(Debug, Deserialize)]
pub struct SetMetadataRequest {
    pub endpoint: String,
    #[serde(rename = "metadataURI")]
    pub metadata_uri: String,
}

/// Overwrite endpoint and metadata reference
pub async fn set_agent_metadata(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Json(request): Json<SetMetadataRequest>,
) -> ApiResult<Json<AgentDetails>> {
    let agent_id = parse_agent_id(&id)?;
    state
        .registry
        .set_agent_metadata(caller, agent_id, request.endpoint, request.metadata_uri)?;

    let record = state.registry.agent_record(agent_id)?;
    Ok(Json(AgentDetails::from(&record)))
}

/// Reputation update request
#[derive(Debug, Deserialize)]
pub struct ReputationRequest {
    /// Signed decimal string
    pub delta: String,
}

/// Reputation update response
#[derive(Debug, Serialize)]
pub struct ReputationResponse {
    pub id: u64,
    pub reputation: String,
}

/// Apply a signed reputation delta
pub async fn update_reputation(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Json(request): Json<ReputationRequest>,
) -> ApiResult<Json<ReputationResponse>> {
    let agent_id = parse_agent_id(&id)?;
    let delta: ReputationDelta = request
        .delta
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid delta: {}", request.delta)))?;

    let reputation = state.registry.update_reputation(caller, agent_id, delta)?;

    Ok(Json(ReputationResponse {
        id: agent_id.get(),
        reputation: reputation.to_string(),
    }))
}

/// Generic acknowledgement
#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
}

impl Ack {
    pub fn ok() -> Json<Self> {
        Json(Self { ok: true })
    }
}

/// Burn an agent token
pub async fn burn_agent(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Ack>> {
    let agent_id = parse_agent_id(&id)?;
    state.registry.burn(caller, agent_id)?;
    tracing::info!(agent_id = %agent_id, caller = %caller, "Burned agent via API");
    Ok(Ack::ok())
}

/// Owner response
#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub id: u64,
    pub owner: Principal,
}

pub async fn get_owner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<OwnerResponse>> {
    let agent_id = parse_agent_id(&id)?;
    let owner = state.registry.owner_of(agent_id)?;
    Ok(Json(OwnerResponse {
        id: agent_id.get(),
        owner,
    }))
}

/// Existence response
#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub id: u64,
    pub exists: bool,
}

pub async fn agent_exists(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ExistsResponse>> {
    let agent_id = parse_agent_id(&id)?;
    Ok(Json(ExistsResponse {
        id: agent_id.get(),
        exists: state.registry.exists(agent_id),
    }))
}

/// Transfer request
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Current owner; defaults to the caller
    #[serde(default)]
    pub from: Option<Principal>,
    pub to: Principal,
}

/// Move an agent token to a new owner
pub async fn transfer_agent(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Json(request): Json<TransferRequest>,
) -> ApiResult<Json<OwnerResponse>> {
    let agent_id = parse_agent_id(&id)?;
    let from = request.from.unwrap_or(caller);
    state
        .registry
        .transfer_from(caller, from, request.to, agent_id)?;

    Ok(Json(OwnerResponse {
        id: agent_id.get(),
        owner: request.to,
    }))
}

/// Single-token approval request; `null` clears it
#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    #[serde(default)]
    pub approved: Option<Principal>,
}

/// Approval response
#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    pub id: u64,
    pub approved: Option<Principal>,
}

pub async fn approve_agent(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Json(request): Json<ApproveRequest>,
) -> ApiResult<Json<ApprovalResponse>> {
    let agent_id = parse_agent_id(&id)?;
    state.registry.approve(caller, request.approved, agent_id)?;
    Ok(Json(ApprovalResponse {
        id: agent_id.get(),
        approved: state.registry.get_approved(agent_id)?,
    }))
}

pub async fn get_approved(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApprovalResponse>> {
    let agent_id = parse_agent_id(&id)?;
    Ok(Json(ApprovalResponse {
        id: agent_id.get(),
        approved: state.registry.get_approved(agent_id)?,
    }))
}
