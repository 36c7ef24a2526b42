//! Role membership and the authorization predicate
//!
//! Two independent relations gate every mutation: role membership (held
//! here) and token ownership (held by the token ledger). [`RoleTable::check`]
//! evaluates a [`Requirement`] against both and returns a tagged
//! [`AccessDecision`] instead of failing eagerly, so callers decide which
//! error kind a denial maps to.

use crate::error::{RegistryError, Result};
use autonomix_types::{AgentId, Principal, Role};
use std::collections::{BTreeSet, HashMap};

/// What a caller must satisfy to perform an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Caller must hold the role
    Role(Role),

    /// Caller must own the token or hold the admin role
    OwnerOrAdmin { agent_id: AgentId, owner: Principal },

    /// Anyone may call
    Open,
}

/// Why a caller was admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    Role,
    Ownership,
    Open,
}

/// Why a caller was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    MissingRole(Role),
    NotOwner(AgentId),
}

/// Outcome of evaluating a [`Requirement`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Granted(Grant),
    Denied(Denial),
}

impl AccessDecision {
    /// Map a denial onto its error kind: role denials are access-control
    /// failures, ownership denials are `NotAuthorized`
    pub fn into_result(self, caller: Principal) -> Result<Grant> {
        match self {
            AccessDecision::Granted(grant) => Ok(grant),
            AccessDecision::Denied(Denial::MissingRole(role)) => {
                Err(RegistryError::AccessControlUnauthorized {
                    account: caller,
                    role,
                })
            }
            AccessDecision::Denied(Denial::NotOwner(agent_id)) => {
                Err(RegistryError::NotAuthorized { caller, agent_id })
            }
        }
    }
}

/// Role membership relation
#[derive(Debug, Clone, Default)]
pub struct RoleTable {
    members: HashMap<Role, BTreeSet<Principal>>,
}

impl RoleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_role(&self, role: &Role, account: &Principal) -> bool {
        self.members
            .get(role)
            .map(|set| set.contains(account))
            .unwrap_or(false)
    }

    /// The role whose holders may grant and revoke `role`. Every role is
    /// administered by the admin role.
    pub fn role_admin(&self, _role: &Role) -> Role {
        Role::admin()
    }

    /// Add `account` to `role`. Returns false when it already held it.
    pub fn grant(&mut self, role: &Role, account: Principal) -> bool {
        self.members.entry(role.clone()).or_default().insert(account)
    }

    /// Remove `account` from `role`. Returns false when it did not hold it.
    pub fn revoke(&mut self, role: &Role, account: &Principal) -> bool {
        match self.members.get_mut(role) {
            Some(set) => set.remove(account),
            None => false,
        }
    }

    /// Members of a role in ascending order
    pub fn members(&self, role: &Role) -> Vec<Principal> {
        self.members
            .get(role)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Evaluate a requirement for `caller`
    pub fn check(&self, caller: &Principal, requirement: &Requirement) -> AccessDecision {
        match requirement {
            Requirement::Open => AccessDecision::Granted(Grant::Open),
            Requirement::Role(role) => {
                if self.has_role(role, caller) {
                    AccessDecision::Granted(Grant::Role)
                } else {
                    AccessDecision::Denied(Denial::MissingRole(role.clone()))
                }
            }
            Requirement::OwnerOrAdmin { agent_id, owner } => {
                if owner == caller {
                    AccessDecision::Granted(Grant::Ownership)
                } else if self.has_role(&Role::admin(), caller) {
                    AccessDecision::Granted(Grant::Role)
                } else {
                    AccessDecision::Denied(Denial::NotOwner(*agent_id))
                }
            }
        }
    }
}
