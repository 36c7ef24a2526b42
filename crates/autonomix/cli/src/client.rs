//! HTTP client for the AutonomiX daemon

use crate::error::{CliError, CliResult};
use autonomix_types::{InterfaceId, Principal, RegistryEventEnvelope, ReputationDelta, Role};
use futures_util::{Stream, StreamExt};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

const CALLER_HEADER: &str = "X-Caller";

/// HTTP client for communicating with the AutonomiX daemon
pub struct AutonomixClient {
    client: Client,
    base_url: String,
    caller: Option<Principal>,
}

/// Daemon health response
#[derive(Debug, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime: String,
}

/// Agent as returned by the daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDetails {
    pub id: u64,
    pub owner: Principal,
    pub endpoint: String,
    #[serde(rename = "metadataURI")]
    pub metadata_uri: String,
    pub reputation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        rename = "imageDataURI",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_data_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentList {
    pub next_id: String,
    pub total_supply: String,
    pub count: usize,
    pub items: Vec<AgentDetails>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Registered {
    pub id: u64,
    pub owner: Principal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReputationUpdate {
    pub id: u64,
    pub reputation: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OwnerInfo {
    pub id: u64,
    pub owner: Principal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OwnedAgents {
    pub owner: Principal,
    pub agents: Vec<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PausedStatus {
    pub paused: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCheck {
    pub role: Role,
    pub account: Principal,
    pub has_role: bool,
    pub admin_role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoleMembers {
    pub role: Role,
    pub members: Vec<Principal>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceInfo {
    pub name: String,
    pub version: u32,
    pub interface_id: InterfaceId,
    pub signatures: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceSupport {
    pub interface_id: InterfaceId,
    pub supported: bool,
}

#[derive(Debug, Deserialize)]
struct Ack {
    #[allow(dead_code)]
    ok: bool,
}

/// Error body produced by the daemon
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    code: String,
}

impl AutonomixClient {
    /// Create a new client
    pub fn new(endpoint: &str, caller: Option<Principal>) -> CliResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: endpoint.trim_end_matches('/').to_string(),
            caller,
        })
    }

    /// Principal mutating requests act as
    pub fn caller(&self) -> CliResult<Principal> {
        self.caller.ok_or(CliError::MissingCaller)
    }

    /// Check daemon health
    pub async fn health_check(&self) -> CliResult<HealthStatus> {
        self.get("/api/v1/health").await
    }

    /// Daemon and registry statistics
    pub async fn daemon_status(&self) -> CliResult<Value> {
        self.get("/api/v1/status").await
    }

    // ========== Agent API ==========

    pub async fn list_agents(&self, resolve: bool) -> CliResult<AgentList> {
        self.get(&format!("/api/v1/agents?resolve={}", resolve))
            .await
    }

    pub async fn get_agent(&self, id: u64, resolve: bool) -> CliResult<AgentDetails> {
        self.get(&format!("/api/v1/agents/{}?resolve={}", id, resolve))
            .await
    }

    /// Full metadata document behind an agent's reference
    pub async fn get_agent_metadata(&self, id: u64) -> CliResult<Value> {
        self.get(&format!("/api/v1/agents/{}/metadata", id)).await
    }

    pub async fn register_agent(
        &self,
        to: Principal,
        endpoint: &str,
        metadata_uri: &str,
    ) -> CliResult<Registered> {
        self.post(
            "/api/v1/agents",
            &serde_json::json!({
                "to": to,
                "endpoint": endpoint,
                "metadataURI": metadata_uri,
            }),
        )
        .await
    }

    pub async fn set_agent_metadata(
        &self,
        id: u64,
        endpoint: &str,
        metadata_uri: &str,
    ) -> CliResult<AgentDetails> {
        self.put(
            &format!("/api/v1/agents/{}/metadata", id),
            &serde_json::json!({ "endpoint": endpoint, "metadataURI": metadata_uri }),
        )
        .await
    }

    pub async fn update_reputation(
        &self,
        id: u64,
        delta: ReputationDelta,
    ) -> CliResult<ReputationUpdate> {
        self.post(
            &format!("/api/v1/agents/{}/reputation", id),
            &serde_json::json!({ "delta": delta.to_string() }),
        )
        .await
    }

    pub async fn burn_agent(&self, id: u64) -> CliResult<()> {
        let _: Ack = self.delete(&format!("/api/v1/agents/{}", id)).await?;
        Ok(())
    }

    pub async fn transfer_agent(
        &self,
        id: u64,
        from: Option<Principal>,
        to: Principal,
    ) -> CliResult<OwnerInfo> {
        self.post(
            &format!("/api/v1/agents/{}/transfer", id),
            &serde_json::json!({ "from": from, "to": to }),
        )
        .await
    }

    pub async fn owner_of(&self, id: u64) -> CliResult<OwnerInfo> {
        self.get(&format!("/api/v1/agents/{}/owner", id)).await
    }

    pub async fn owner_agents(&self, owner: Principal) -> CliResult<OwnedAgents> {
        self.get(&format!("/api/v1/owners/{}/agents", owner)).await
    }

    // ========== Admin API ==========

    pub async fn paused(&self) -> CliResult<PausedStatus> {
        self.get("/api/v1/admin/paused").await
    }

    pub async fn pause(&self) -> CliResult<PausedStatus> {
        self.post("/api/v1/admin/pause", &serde_json::json!({})).await
    }

    pub async fn unpause(&self) -> CliResult<PausedStatus> {
        self.post("/api/v1/admin/unpause", &serde_json::json!({}))
            .await
    }

    // ========== Role API ==========

    pub async fn grant_role(&self, role: &Role, account: Principal) -> CliResult<()> {
        let _: Ack = self
            .post(
                "/api/v1/roles/grant",
                &serde_json::json!({ "role": role, "account": account }),
            )
            .await?;
        Ok(())
    }

    pub async fn revoke_role(&self, role: &Role, account: Principal) -> CliResult<()> {
        let _: Ack = self
            .post(
                "/api/v1/roles/revoke",
                &serde_json::json!({ "role": role, "account": account }),
            )
            .await?;
        Ok(())
    }

    pub async fn renounce_role(&self, role: &Role, confirmation: Principal) -> CliResult<()> {
        let _: Ack = self
            .post(
                "/api/v1/roles/renounce",
                &serde_json::json!({ "role": role, "confirmation": confirmation }),
            )
            .await?;
        Ok(())
    }

    pub async fn check_role(&self, role: &Role, account: Principal) -> CliResult<RoleCheck> {
        self.get(&format!("/api/v1/roles/{}/{}", role, account))
            .await
    }

    pub async fn role_members(&self, role: &Role) -> CliResult<RoleMembers> {
        self.get(&format!("/api/v1/roles/{}/members", role)).await
    }

    // ========== Interface API ==========

    pub async fn list_interfaces(&self) -> CliResult<Vec<InterfaceInfo>> {
        self.get("/api/v1/interfaces").await
    }

    pub async fn supports_interface(&self, id: InterfaceId) -> CliResult<InterfaceSupport> {
        self.get(&format!("/api/v1/interfaces/{}", id)).await
    }

    // ========== Events API ==========

    /// Follow the daemon's server-sent event stream
    pub async fn stream_events(
        &self,
    ) -> CliResult<impl Stream<Item = CliResult<RegistryEventEnvelope>>> {
        // The shared client carries a request timeout; a followed stream must not
        let response = Client::new()
            .get(format!("{}/api/v1/events/stream", self.base_url))
            .header("Accept", "text/event-stream")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let stream = futures_util::stream::unfold(
            (response.bytes_stream(), SseBuffer::default()),
            |(mut bytes, mut buffer)| async move {
                loop {
                    if let Some(data) = buffer.next_data() {
                        let item = serde_json::from_str(&data).map_err(CliError::from);
                        return Some((item, (bytes, buffer)));
                    }
                    match bytes.next().await {
                        Some(Ok(chunk)) => buffer.push(&chunk),
                        Some(Err(e)) => return Some((Err(CliError::from(e)), (bytes, buffer))),
                        None => return None,
                    }
                }
            },
        );

        Ok(stream)
    }

    // ========== Internal HTTP helpers ==========

    fn with_caller(&self, request: RequestBuilder) -> RequestBuilder {
        match self.caller {
            Some(caller) => request.header(CALLER_HEADER, caller.to_string()),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> CliResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;
        Self::handle_response(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> CliResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .with_caller(self.client.post(&url))
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> CliResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .with_caller(self.client.put(&url))
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> CliResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.with_caller(self.client.delete(&url)).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> CliResult<T> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::error_from(response).await)
        }
    }

    async fn error_from(response: reqwest::Response) -> CliError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) if status == StatusCode::NOT_FOUND => CliError::NotFound(body.error),
            Ok(body) => CliError::Api {
                status: status.as_u16(),
                code: body.code,
                message: body.error,
            },
            Err(_) if status == StatusCode::NOT_FOUND => {
                CliError::NotFound("Resource not found".into())
            }
            Err(_) => CliError::Api {
                status: status.as_u16(),
                code: status.canonical_reason().unwrap_or("ERROR").to_string(),
                message: text,
            },
        }
    }
}

/// Accumulates server-sent event bytes and yields each event's data
#[derive(Debug, Default)]
struct SseBuffer {
    pending: String,
}

impl SseBuffer {
    fn push(&mut self, chunk: &[u8]) {
        self.pending
            .push_str(&String::from_utf8_lossy(chunk).replace("\r\n", "\n"));
    }

    /// Data of the next complete event; comment-only events are skipped
    fn next_data(&mut self) -> Option<String> {
        while let Some(end) = self.pending.find("\n\n") {
            let block: String = self.pending.drain(..end + 2).collect();
            let data: Vec<&str> = block
                .lines()
                .filter_map(|line| line.strip_prefix("data:"))
                .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
                .collect();
            if !data.is_empty() {
                return Some(data.join("\n"));
            }
        }
        None
    }
}
