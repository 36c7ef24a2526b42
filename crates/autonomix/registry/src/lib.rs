//! AutonomiX Registry - Agent token state machine
//!
//! The registry owns every agent token record, the role table and the pause
//! flag. Each operation takes the calling principal explicitly, validates
//! authorization and arguments, mutates state, and publishes a sequenced
//! [`RegistryEventEnvelope`](autonomix_types::RegistryEventEnvelope).
//!
//! # Authorization
//!
//! Two independent relations gate mutations:
//!
//! - **Roles**: `registerAgent`, `pause`, `unpause` and role management need
//!   the admin role. Failures are [`RegistryError::AccessControlUnauthorized`].
//! - **Ownership**: `setAgentMetadata` and `burn` need the token owner or an
//!   admin. Failures are [`RegistryError::NotAuthorized`].
//!
//! # Example
//!
//! ```
//! use autonomix_registry::AgentRegistry;
//! use autonomix_types::Principal;
//!
//! let admin: Principal = "0x00000000000000000000000000000000000000a1".parse().unwrap();
//! let registry = AgentRegistry::new(admin).unwrap();
//!
//! let id = registry
//!     .register_agent(admin, admin, "https://agent.example", "ipfs://meta")
//!     .unwrap();
//! assert_eq!(registry.update_reputation(admin, id, 10).unwrap(), 10);
//! assert_eq!(registry.update_reputation(admin, id, -20).unwrap(), 0);
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod access;
pub mod config;
pub mod error;
pub mod events;
pub mod interface;
pub mod registry;
pub mod reputation;
pub mod tokens;

pub use access::{AccessDecision, Denial, Grant, Requirement, RoleTable};
pub use config::{RegistryConfig, ReputationPolicy};
pub use error::{RegistryError, Result};
pub use events::EventBus;
pub use interface::{selector, supported_interfaces, InterfaceSpec};
pub use registry::AgentRegistry;
pub use reputation::apply_delta;
