//! Agent token records

use crate::ids::{AgentId, Principal};
use serde::{Deserialize, Serialize};

/// Reputation score. Never negative.
pub type Reputation = u128;

/// Signed reputation adjustment. `ReputationDelta::MIN` is rejected because
/// its magnitude is not representable.
pub type ReputationDelta = i128;

/// Full state of a live agent token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Token id
    pub id: AgentId,

    /// Current owner
    pub owner: Principal,

    /// Opaque service address
    pub endpoint: String,

    /// Opaque reference to the agent's metadata document
    #[serde(rename = "metadataURI")]
    pub metadata_uri: String,

    /// Accumulated reputation
    pub reputation: Reputation,
}

impl AgentRecord {
    /// Project the record onto the `getAgent` shape
    pub fn view(&self) -> AgentView {
        AgentView {
            endpoint: self.endpoint.clone(),
            metadata_uri: self.metadata_uri.clone(),
            reputation: self.reputation,
        }
    }
}

/// The `(endpoint, metadataURI, reputation)` triple returned by `getAgent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentView {
    pub endpoint: String,

    #[serde(rename = "metadataURI")]
    pub metadata_uri: String,

    pub reputation: Reputation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_projection() {
        let record = AgentRecord {
            id: AgentId::new(3),
            owner: Principal::from_bytes([9; 20]),
            endpoint: "https://agent.example".to_string(),
            metadata_uri: "ipfs://QmMeta".to_string(),
            reputation: 42,
        };
        let view = record.view();
        assert_eq!(view.endpoint, "https://agent.example");
        assert_eq!(view.metadata_uri, "ipfs://QmMeta");
        assert_eq!(view.reputation, 42);
    }

    #[test]
    fn test_metadata_uri_wire_name() {
        let view = AgentView {
            endpoint: "https://a".to_string(),
            metadata_uri: "ipfs://m".to_string(),
            reputation: 0,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["metadataURI"], "ipfs://m");
    }
}
