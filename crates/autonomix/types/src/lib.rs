//! AutonomiX Types - Core types for the agent identity registry
//!
//! This crate defines the vocabulary shared by the registry core, the daemon
//! and the CLI:
//!
//! - **Principal**: 20-byte caller/owner identity
//! - **AgentId**: positive, never-reused token identifier
//! - **Role**: named capability grant (`DEFAULT_ADMIN_ROLE` at minimum)
//! - **AgentRecord / AgentView**: token state as stored and as read back
//! - **InterfaceId**: 4-byte capability fingerprint used for introspection
//! - **RegistryEvent**: ordered notifications emitted by every mutation

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod agent;
pub mod events;
pub mod ids;
pub mod interface;
pub mod role;

// Re-exports
pub use agent::{AgentRecord, AgentView, Reputation, ReputationDelta};
pub use events::{RegistryEvent, RegistryEventEnvelope};
pub use ids::{AgentId, ParseAgentIdError, ParsePrincipalError, Principal};
pub use interface::{InterfaceId, ParseInterfaceIdError};
pub use role::Role;
