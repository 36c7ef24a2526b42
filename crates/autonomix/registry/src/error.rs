//! Registry error types

use autonomix_types::{AgentId, Principal, Role};
use thiserror::Error;

/// Registry errors.
///
/// Every failing operation returns exactly one of these and leaves the
/// registry state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The null principal was supplied where a real one is required
    #[error("zero address supplied where a principal is required")]
    ZeroAddress,

    /// Caller is neither the token owner nor an admin (ownership rule)
    #[error("{caller} is not authorized for agent {agent_id}")]
    NotAuthorized { caller: Principal, agent_id: AgentId },

    /// Caller lacks a required role (role rule)
    #[error("account {account} is missing role {role}")]
    AccessControlUnauthorized { account: Principal, role: Role },

    /// No live token with this id
    #[error("agent {0} does not exist")]
    TokenNonexistent(AgentId),

    /// A required string field was empty
    #[error("invalid metadata: {field} must not be empty")]
    InvalidMetadata { field: &'static str },

    /// Delta equals the signed minimum and cannot be negated
    #[error("reputation delta must be greater than the signed minimum")]
    InvalidDeltaMin,

    /// The registry is paused
    #[error("registry is paused")]
    EnforcedPause,

    /// The registry is not paused
    #[error("registry is not paused")]
    ExpectedPause,

    /// `from` does not own the token being transferred
    #[error("agent {agent_id} is owned by {owner}, not {claimed}")]
    IncorrectOwner {
        agent_id: AgentId,
        owner: Principal,
        claimed: Principal,
    },

    /// Enumeration index past the end
    #[error("index {index} out of bounds (length {len})")]
    OutOfBoundsIndex { index: usize, len: usize },

    /// `renounceRole` confirmation does not match the caller
    #[error("renounce confirmation does not match caller")]
    BadConfirmation,

    /// The id space is exhausted
    #[error("agent id space exhausted")]
    IdExhausted,
}

impl RegistryError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::ZeroAddress => "ZERO_ADDRESS",
            RegistryError::NotAuthorized { .. } => "NOT_AUTHORIZED",
            RegistryError::AccessControlUnauthorized { .. } => "ACCESS_CONTROL_UNAUTHORIZED",
            RegistryError::TokenNonexistent(_) => "TOKEN_NONEXISTENT",
            RegistryError::InvalidMetadata { .. } => "INVALID_METADATA",
            RegistryError::InvalidDeltaMin => "INVALID_DELTA_MIN",
            RegistryError::EnforcedPause => "ENFORCED_PAUSE",
            RegistryError::ExpectedPause => "EXPECTED_PAUSE",
            RegistryError::IncorrectOwner { .. } => "INCORRECT_OWNER",
            RegistryError::OutOfBoundsIndex { .. } => "OUT_OF_BOUNDS_INDEX",
            RegistryError::BadConfirmation => "BAD_CONFIRMATION",
            RegistryError::IdExhausted => "ID_EXHAUSTED",
        }
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
