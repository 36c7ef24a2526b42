//! Event types for registry notifications
//!
//! Every successful mutation produces exactly one event per state change,
//! wrapped in an envelope carrying a gap-free sequence number so subscribers
//! can detect missed notifications.

use crate::agent::{Reputation, ReputationDelta};
use crate::ids::{AgentId, Principal};
use crate::role::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope wrapping all registry events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEventEnvelope {
    /// Position in the registry's commit order, starting at 1
    pub sequence: u64,

    /// Unique event ID
    pub id: Uuid,

    /// Event timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Principal whose call produced the event
    pub actor: Principal,

    /// The actual event
    pub event: RegistryEvent,
}

/// Registry events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    // ═══════════════════════════════════════════════════════════════════
    // AGENT EVENTS
    // ═══════════════════════════════════════════════════════════════════
    /// Agent token minted
    AgentRegistered {
        agent_id: AgentId,
        owner: Principal,
        endpoint: String,
        metadata_uri: String,
    },

    /// Endpoint and metadata reference overwritten
    AgentMetadataUpdated {
        agent_id: AgentId,
        endpoint: String,
        metadata_uri: String,
    },

    /// Reputation adjusted; `delta` is the requested signed value, the stored
    /// value is clamped
    ReputationUpdated {
        agent_id: AgentId,
        old_reputation: Reputation,
        new_reputation: Reputation,
        delta: ReputationDelta,
    },

    /// Agent token destroyed
    AgentBurned {
        agent_id: AgentId,
        owner: Principal,
    },

    // ═══════════════════════════════════════════════════════════════════
    // OWNERSHIP EVENTS
    // ═══════════════════════════════════════════════════════════════════
    /// Ownership moved between principals
    Transfer {
        agent_id: AgentId,
        from: Principal,
        to: Principal,
    },

    /// Single-token approval set or cleared
    Approval {
        agent_id: AgentId,
        owner: Principal,
        approved: Option<Principal>,
    },

    /// Operator approval for all of an owner's tokens changed
    ApprovalForAll {
        owner: Principal,
        operator: Principal,
        approved: bool,
    },

    // ═══════════════════════════════════════════════════════════════════
    // CONTROL EVENTS
    // ═══════════════════════════════════════════════════════════════════
    /// Registration halted
    Paused { account: Principal },

    /// Registration resumed
    Unpaused { account: Principal },

    /// Role granted
    RoleGranted {
        role: Role,
        account: Principal,
        sender: Principal,
    },

    /// Role revoked or renounced
    RoleRevoked {
        role: Role,
        account: Principal,
        sender: Principal,
    },
}

impl RegistryEvent {
    /// Stable event name, matching the notification names clients subscribe to
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryEvent::AgentRegistered { .. } => "AgentRegistered",
            RegistryEvent::AgentMetadataUpdated { .. } => "AgentMetadataUpdated",
            RegistryEvent::ReputationUpdated { .. } => "ReputationUpdated",
            RegistryEvent::AgentBurned { .. } => "AgentBurned",
            RegistryEvent::Transfer { .. } => "Transfer",
            RegistryEvent::Approval { .. } => "Approval",
            RegistryEvent::ApprovalForAll { .. } => "ApprovalForAll",
            RegistryEvent::Paused { .. } => "Paused",
            RegistryEvent::Unpaused { .. } => "Unpaused",
            RegistryEvent::RoleGranted { .. } => "RoleGranted",
            RegistryEvent::RoleRevoked { .. } => "RoleRevoked",
        }
    }

    /// The agent this event concerns, if any
    pub fn agent_id(&self) -> Option<AgentId> {
        match self {
            RegistryEvent::AgentRegistered { agent_id, .. }
            | RegistryEvent::AgentMetadataUpdated { agent_id, .. }
            | RegistryEvent::ReputationUpdated { agent_id, .. }
            | RegistryEvent::AgentBurned { agent_id, .. }
            | RegistryEvent::Transfer { agent_id, .. }
            | RegistryEvent::Approval { agent_id, .. } => Some(*agent_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_and_agent() {
        let event = RegistryEvent::ReputationUpdated {
            agent_id: AgentId::new(1),
            old_reputation: 10,
            new_reputation: 7,
            delta: -3,
        };
        assert_eq!(event.kind(), "ReputationUpdated");
        assert_eq!(event.agent_id(), Some(AgentId::new(1)));

        let paused = RegistryEvent::Paused {
            account: Principal::ZERO,
        };
        assert_eq!(paused.agent_id(), None);
    }

    #[test]
    fn test_envelope_serde_keeps_signed_delta() {
        let envelope = RegistryEventEnvelope {
            sequence: 4,
            id: Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            actor: Principal::from_bytes([2; 20]),
            event: RegistryEvent::ReputationUpdated {
                agent_id: AgentId::new(1),
                old_reputation: 7,
                new_reputation: 0,
                delta: -20,
            },
        };
        let json = serde_json::to_string(&envelope).unwrap();
        let back: RegistryEventEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sequence, 4);
        assert_eq!(back.event, envelope.event);
    }
}
