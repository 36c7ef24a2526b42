//! Registry construction options

use crate::events::DEFAULT_EVENT_CAPACITY;
use autonomix_types::Role;
use serde::{Deserialize, Serialize};

/// Who may call `update_reputation`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReputationPolicy {
    /// Any caller
    #[default]
    Open,

    /// Only holders of the given role
    RoleGated(Role),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Collection name reported by `name()`
    pub name: String,

    /// Collection symbol reported by `symbol()`
    pub symbol: String,

    /// Reject empty endpoint or metadata URI at registration time.
    /// Off by default: only `set_agent_metadata` validates.
    pub validate_metadata_on_register: bool,

    pub reputation_policy: ReputationPolicy,

    /// Broadcast buffer per event subscriber
    pub event_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            name: "AutonomiX Agent".to_string(),
            symbol: "AGENT".to_string(),
            validate_metadata_on_register: false,
            reputation_policy: ReputationPolicy::Open,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}
