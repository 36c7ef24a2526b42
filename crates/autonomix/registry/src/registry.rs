//! The agent registry state machine

use crate::access::{Requirement, RoleTable};
use crate::config::{RegistryConfig, ReputationPolicy};
use crate::error::{RegistryError, Result};
use crate::events::EventBus;
use crate::interface;
use crate::reputation::apply_delta;
use crate::tokens::TokenLedger;
use autonomix_types::{
    AgentId, AgentRecord, AgentView, InterfaceId, Principal, RegistryEvent,
    RegistryEventEnvelope, Reputation, ReputationDelta, Role,
};
use parking_lot::Mutex;
use tokio::sync::broadcast;

struct RegistryState {
    tokens: TokenLedger,
    roles: RoleTable,
    paused: bool,
    events: EventBus,
}

/// Agent identity registry.
///
/// All state sits behind one lock. Every operation validates fully before
/// mutating, then publishes its events before releasing the lock, so the
/// event stream order equals commit order.
pub struct AgentRegistry {
    state: Mutex<RegistryState>,
    config: RegistryConfig,
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("name", &self.config.name)
            .field("symbol", &self.config.symbol)
            .finish_non_exhaustive()
    }
}

fn require_non_empty(value: &str, field: &'static str) -> Result<()> {
    if value.is_empty() {
        return Err(RegistryError::InvalidMetadata { field });
    }
    Ok(())
}

impl AgentRegistry {
    /// Create a registry with `admin` holding the admin role
    pub fn new(admin: Principal) -> Result<Self> {
        Self::with_config(admin, RegistryConfig::default())
    }

    pub fn with_config(admin: Principal, config: RegistryConfig) -> Result<Self> {
        if admin.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }

        let mut roles = RoleTable::new();
        roles.grant(&Role::admin(), admin);

        let mut events = EventBus::new(config.event_capacity);
        events.publish(
            admin,
            RegistryEvent::RoleGranted {
                role: Role::admin(),
                account: admin,
                sender: admin,
            },
        );

        tracing::info!(admin = %admin, name = %config.name, "Agent registry created");

        Ok(Self {
            state: Mutex::new(RegistryState {
                tokens: TokenLedger::new(),
                roles,
                paused: false,
                events,
            }),
            config,
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Receive every event committed after this call
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEventEnvelope> {
        self.state.lock().events.subscribe()
    }

    pub fn last_event_sequence(&self) -> u64 {
        self.state.lock().events.last_sequence()
    }

    // ═══════════════════════════════════════════════════════════════════
    // AGENT LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════

    /// Mint a new agent token owned by `to`
    pub fn register_agent(
        &self,
        caller: Principal,
        to: Principal,
        endpoint: impl Into<String>,
        metadata_uri: impl Into<String>,
    ) -> Result<AgentId> {
        let endpoint = endpoint.into();
        let metadata_uri = metadata_uri.into();
        let mut state = self.state.lock();

        state
            .roles
            .check(&caller, &Requirement::Role(Role::admin()))
            .into_result(caller)?;
        if state.paused {
            return Err(RegistryError::EnforcedPause);
        }
        if to.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        if self.config.validate_metadata_on_register {
            require_non_empty(&endpoint, "endpoint")?;
            require_non_empty(&metadata_uri, "metadataURI")?;
        }

        let agent_id = state
            .tokens
            .mint(to, endpoint.clone(), metadata_uri.clone())?;

        state.events.publish(
            caller,
            RegistryEvent::Transfer {
                agent_id,
                from: Principal::ZERO,
                to,
            },
        );
        state.events.publish(
            caller,
            RegistryEvent::AgentRegistered {
                agent_id,
                owner: to,
                endpoint,
                metadata_uri,
            },
        );

        tracing::info!(agent_id = %agent_id, owner = %to, "Agent registered");
        Ok(agent_id)
    }

    /// Overwrite endpoint and metadata reference
    pub fn set_agent_metadata(
        &self,
        caller: Principal,
        agent_id: AgentId,
        endpoint: impl Into<String>,
        metadata_uri: impl Into<String>,
    ) -> Result<()> {
        let endpoint = endpoint.into();
        let metadata_uri = metadata_uri.into();
        let mut state = self.state.lock();

        let owner = state.tokens.owner_of(agent_id)?;
        state
            .roles
            .check(&caller, &Requirement::OwnerOrAdmin { agent_id, owner })
            .into_result(caller)?;
        require_non_empty(&endpoint, "endpoint")?;
        require_non_empty(&metadata_uri, "metadataURI")?;

        let record = state.tokens.get_mut(agent_id)?;
        record.endpoint = endpoint.clone();
        record.metadata_uri = metadata_uri.clone();

        state.events.publish(
            caller,
            RegistryEvent::AgentMetadataUpdated {
                agent_id,
                endpoint,
                metadata_uri,
            },
        );

        tracing::info!(agent_id = %agent_id, caller = %caller, "Agent metadata updated");
        Ok(())
    }

    /// Apply a signed delta to an agent's reputation, clamping at zero.
    /// Returns the new score.
    pub fn update_reputation(
        &self,
        caller: Principal,
        agent_id: AgentId,
        delta: ReputationDelta,
    ) -> Result<Reputation> {
        let mut state = self.state.lock();

        let requirement = match &self.config.reputation_policy {
            ReputationPolicy::Open => Requirement::Open,
            ReputationPolicy::RoleGated(role) => Requirement::Role(role.clone()),
        };
        state.roles.check(&caller, &requirement).into_result(caller)?;

        let old_reputation = state.tokens.get(agent_id)?.reputation;
        let new_reputation = apply_delta(old_reputation, delta)?;
        state.tokens.get_mut(agent_id)?.reputation = new_reputation;

        state.events.publish(
            caller,
            RegistryEvent::ReputationUpdated {
                agent_id,
                old_reputation,
                new_reputation,
                delta,
            },
        );

        tracing::debug!(
            agent_id = %agent_id,
            old = %old_reputation,
            new = %new_reputation,
            delta = %delta,
            "Reputation updated"
        );
        Ok(new_reputation)
    }

    /// Destroy an agent token. The id is never handed out again.
    pub fn burn(&self, caller: Principal, agent_id: AgentId) -> Result<()> {
        let mut state = self.state.lock();

        let owner = state.tokens.owner_of(agent_id)?;
        state
            .roles
            .check(&caller, &Requirement::OwnerOrAdmin { agent_id, owner })
            .into_result(caller)?;

        state.tokens.burn(agent_id)?;

        state.events.publish(
            caller,
            RegistryEvent::Transfer {
                agent_id,
                from: owner,
                to: Principal::ZERO,
            },
        );
        state
            .events
            .publish(caller, RegistryEvent::AgentBurned { agent_id, owner });

        tracing::info!(agent_id = %agent_id, owner = %owner, "Agent burned");
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // AGENT READS
    // ═══════════════════════════════════════════════════════════════════

    pub fn get_agent(&self, agent_id: AgentId) -> Result<AgentView> {
        self.state.lock().tokens.get(agent_id).map(AgentRecord::view)
    }

    /// Full record including owner
    pub fn agent_record(&self, agent_id: AgentId) -> Result<AgentRecord> {
        self.state.lock().tokens.get(agent_id).cloned()
    }

    pub fn agent_endpoint(&self, agent_id: AgentId) -> Result<String> {
        self.state
            .lock()
            .tokens
            .get(agent_id)
            .map(|record| record.endpoint.clone())
    }

    pub fn agent_metadata_uri(&self, agent_id: AgentId) -> Result<String> {
        self.state
            .lock()
            .tokens
            .get(agent_id)
            .map(|record| record.metadata_uri.clone())
    }

    pub fn reputation_of(&self, agent_id: AgentId) -> Result<Reputation> {
        self.state
            .lock()
            .tokens
            .get(agent_id)
            .map(|record| record.reputation)
    }

    /// Token URI; identical to the metadata reference
    pub fn token_uri(&self, agent_id: AgentId) -> Result<String> {
        self.agent_metadata_uri(agent_id)
    }

    pub fn owner_of(&self, agent_id: AgentId) -> Result<Principal> {
        self.state.lock().tokens.owner_of(agent_id)
    }

    pub fn exists(&self, agent_id: AgentId) -> bool {
        self.state.lock().tokens.exists(agent_id)
    }

    /// The id the next successful registration will receive
    pub fn next_agent_id(&self) -> AgentId {
        self.state.lock().tokens.next_id()
    }

    pub fn total_supply(&self) -> usize {
        self.state.lock().tokens.total_supply()
    }

    pub fn balance_of(&self, owner: Principal) -> Result<usize> {
        if owner.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        Ok(self.state.lock().tokens.balance_of(&owner))
    }

    pub fn token_by_index(&self, index: usize) -> Result<AgentId> {
        self.state.lock().tokens.token_by_index(index)
    }

    pub fn token_of_owner_by_index(&self, owner: Principal, index: usize) -> Result<AgentId> {
        self.state.lock().tokens.token_of_owner_by_index(&owner, index)
    }

    /// Ids owned by `owner`, ascending
    pub fn tokens_of(&self, owner: Principal) -> Vec<AgentId> {
        self.state.lock().tokens.tokens_of(&owner)
    }

    /// Live records, ascending by id
    pub fn list_agents(&self) -> Vec<AgentRecord> {
        self.state.lock().tokens.records().cloned().collect()
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    // ═══════════════════════════════════════════════════════════════════
    // OWNERSHIP
    // ═══════════════════════════════════════════════════════════════════

    /// Set or clear the single-token approval
    pub fn approve(
        &self,
        caller: Principal,
        approved: Option<Principal>,
        agent_id: AgentId,
    ) -> Result<()> {
        let mut state = self.state.lock();

        let owner = state.tokens.owner_of(agent_id)?;
        if caller != owner && !state.tokens.is_operator(&owner, &caller) {
            return Err(RegistryError::NotAuthorized { caller, agent_id });
        }
        let approved = approved.filter(|principal| !principal.is_zero());
        state.tokens.set_approval(agent_id, approved)?;

        state.events.publish(
            caller,
            RegistryEvent::Approval {
                agent_id,
                owner,
                approved,
            },
        );
        Ok(())
    }

    pub fn set_approval_for_all(
        &self,
        caller: Principal,
        operator: Principal,
        approved: bool,
    ) -> Result<()> {
        if operator.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        let mut state = self.state.lock();
        state.tokens.set_operator(caller, operator, approved);
        state.events.publish(
            caller,
            RegistryEvent::ApprovalForAll {
                owner: caller,
                operator,
                approved,
            },
        );
        Ok(())
    }

    pub fn get_approved(&self, agent_id: AgentId) -> Result<Option<Principal>> {
        self.state.lock().tokens.approved(agent_id)
    }

    pub fn is_approved_for_all(&self, owner: Principal, operator: Principal) -> bool {
        self.state.lock().tokens.is_operator(&owner, &operator)
    }

    /// Move a token from `from` to `to`. The admin role confers no
    /// transfer right.
    pub fn transfer_from(
        &self,
        caller: Principal,
        from: Principal,
        to: Principal,
        agent_id: AgentId,
    ) -> Result<()> {
        let mut state = self.state.lock();

        let owner = state.tokens.owner_of(agent_id)?;
        if to.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        if owner != from {
            return Err(RegistryError::IncorrectOwner {
                agent_id,
                owner,
                claimed: from,
            });
        }
        if !state.tokens.can_transfer(&caller, agent_id)? {
            return Err(RegistryError::NotAuthorized { caller, agent_id });
        }

        state.tokens.transfer(agent_id, to)?;
        state
            .events
            .publish(caller, RegistryEvent::Transfer { agent_id, from, to });

        tracing::info!(agent_id = %agent_id, from = %from, to = %to, "Agent transferred");
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // PAUSE
    // ═══════════════════════════════════════════════════════════════════

    /// Halt registration
    pub fn pause(&self, caller: Principal) -> Result<()> {
        let mut state = self.state.lock();
        state
            .roles
            .check(&caller, &Requirement::Role(Role::admin()))
            .into_result(caller)?;
        if state.paused {
            return Err(RegistryError::EnforcedPause);
        }
        state.paused = true;
        state
            .events
            .publish(caller, RegistryEvent::Paused { account: caller });

        tracing::warn!(account = %caller, "Registry paused");
        Ok(())
    }

    /// Resume registration
    pub fn unpause(&self, caller: Principal) -> Result<()> {
        let mut state = self.state.lock();
        state
            .roles
            .check(&caller, &Requirement::Role(Role::admin()))
            .into_result(caller)?;
        if !state.paused {
            return Err(RegistryError::ExpectedPause);
        }
        state.paused = false;
        state
            .events
            .publish(caller, RegistryEvent::Unpaused { account: caller });

        tracing::info!(account = %caller, "Registry unpaused");
        Ok(())
    }

    pub fn paused(&self) -> bool {
        self.state.lock().paused
    }

    // ═══════════════════════════════════════════════════════════════════
    // ROLES
    // ═══════════════════════════════════════════════════════════════════

    pub fn has_role(&self, role: &Role, account: Principal) -> bool {
        self.state.lock().roles.has_role(role, &account)
    }

    pub fn get_role_admin(&self, role: &Role) -> Role {
        self.state.lock().roles.role_admin(role)
    }

    pub fn role_members(&self, role: &Role) -> Vec<Principal> {
        self.state.lock().roles.members(role)
    }

    /// Grant `role` to `account`. A redundant grant succeeds without an event.
    pub fn grant_role(&self, caller: Principal, role: &Role, account: Principal) -> Result<()> {
        let mut state = self.state.lock();
        let admin_role = state.roles.role_admin(role);
        state
            .roles
            .check(&caller, &Requirement::Role(admin_role))
            .into_result(caller)?;
        if account.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }

        if state.roles.grant(role, account) {
            state.events.publish(
                caller,
                RegistryEvent::RoleGranted {
                    role: role.clone(),
                    account,
                    sender: caller,
                },
            );
            tracing::info!(role = %role, account = %account, "Role granted");
        }
        Ok(())
    }

    /// Revoke `role` from `account`. A redundant revoke succeeds without an
    /// event.
    pub fn revoke_role(&self, caller: Principal, role: &Role, account: Principal) -> Result<()> {
        let mut state = self.state.lock();
        let admin_role = state.roles.role_admin(role);
        state
            .roles
            .check(&caller, &Requirement::Role(admin_role))
            .into_result(caller)?;

        if state.roles.revoke(role, &account) {
            state.events.publish(
                caller,
                RegistryEvent::RoleRevoked {
                    role: role.clone(),
                    account,
                    sender: caller,
                },
            );
            tracing::info!(role = %role, account = %account, "Role revoked");
        }
        Ok(())
    }

    /// Drop a role the caller holds. `confirmation` must equal the caller.
    pub fn renounce_role(
        &self,
        caller: Principal,
        role: &Role,
        confirmation: Principal,
    ) -> Result<()> {
        if confirmation != caller {
            return Err(RegistryError::BadConfirmation);
        }
        let mut state = self.state.lock();
        if state.roles.revoke(role, &caller) {
            state.events.publish(
                caller,
                RegistryEvent::RoleRevoked {
                    role: role.clone(),
                    account: caller,
                    sender: caller,
                },
            );
            tracing::info!(role = %role, account = %caller, "Role renounced");
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // INTROSPECTION
    // ═══════════════════════════════════════════════════════════════════

    pub fn supports_interface(&self, id: InterfaceId) -> bool {
        interface::supports_interface(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(byte: u8) -> Principal {
        Principal::from_bytes([byte; 20])
    }

    #[test]
    fn test_construction_rejects_zero_admin() {
        assert!(matches!(
            AgentRegistry::new(Principal::ZERO),
            Err(RegistryError::ZeroAddress)
        ));
    }

    #[test]
    fn test_construction_emits_role_granted() {
        let registry = AgentRegistry::new(principal(1)).unwrap();
        assert_eq!(registry.last_event_sequence(), 1);
        assert!(registry.has_role(&Role::admin(), principal(1)));
        assert_eq!(registry.next_agent_id(), AgentId::FIRST);
        assert!(!registry.paused());
    }

    #[test]
    fn test_register_check_order() {
        let admin = principal(1);
        let registry = AgentRegistry::new(admin).unwrap();
        registry.pause(admin).unwrap();

        // role is checked before pause
        assert!(matches!(
            registry.register_agent(principal(2), principal(2), "e", "m"),
            Err(RegistryError::AccessControlUnauthorized { .. })
        ));
        // pause is checked before the recipient
        assert_eq!(
            registry.register_agent(admin, Principal::ZERO, "e", "m"),
            Err(RegistryError::EnforcedPause)
        );
        registry.unpause(admin).unwrap();
        assert_eq!(
            registry.register_agent(admin, Principal::ZERO, "e", "m"),
            Err(RegistryError::ZeroAddress)
        );
        assert_eq!(registry.next_agent_id(), AgentId::FIRST);
    }

    #[test]
    fn test_register_accepts_empty_fields_by_default() {
        let admin = principal(1);
        let registry = AgentRegistry::new(admin).unwrap();
        let id = registry.register_agent(admin, admin, "", "").unwrap();
        assert_eq!(registry.agent_endpoint(id).unwrap(), "");
    }

    #[test]
    fn test_register_validation_opt_in() {
        let admin = principal(1);
        let config = RegistryConfig {
            validate_metadata_on_register: true,
            ..RegistryConfig::default()
        };
        let registry = AgentRegistry::with_config(admin, config).unwrap();
        assert_eq!(
            registry.register_agent(admin, admin, "", "ipfs://m"),
            Err(RegistryError::InvalidMetadata { field: "endpoint" })
        );
        assert_eq!(
            registry.register_agent(admin, admin, "https://a", ""),
            Err(RegistryError::InvalidMetadata {
                field: "metadataURI"
            })
        );
    }

    #[test]
    fn test_role_gated_reputation() {
        let admin = principal(1);
        let oracle = principal(7);
        let role = Role::new("ORACLE_ROLE");
        let config = RegistryConfig {
            reputation_policy: ReputationPolicy::RoleGated(role.clone()),
            ..RegistryConfig::default()
        };
        let registry = AgentRegistry::with_config(admin, config).unwrap();
        let id = registry.register_agent(admin, admin, "e", "m").unwrap();

        assert!(matches!(
            registry.update_reputation(oracle, id, 1),
            Err(RegistryError::AccessControlUnauthorized { .. })
        ));
        registry.grant_role(admin, &role, oracle).unwrap();
        assert_eq!(registry.update_reputation(oracle, id, 1).unwrap(), 1);
    }

    #[test]
    fn test_open_reputation_admits_any_caller() {
        let admin = principal(1);
        let registry = AgentRegistry::new(admin).unwrap();
        let id = registry.register_agent(admin, admin, "e", "m").unwrap();

        assert_eq!(registry.update_reputation(Principal::ZERO, id, 5).unwrap(), 5);
        assert_eq!(registry.update_reputation(principal(9), id, -2).unwrap(), 3);
    }

    #[test]
    fn test_redundant_pause_and_unpause() {
        let admin = principal(1);
        let registry = AgentRegistry::new(admin).unwrap();
        assert_eq!(registry.unpause(admin), Err(RegistryError::ExpectedPause));
        registry.pause(admin).unwrap();
        assert_eq!(registry.pause(admin), Err(RegistryError::EnforcedPause));
    }

    #[test]
    fn test_admin_cannot_transfer_foreign_token() {
        let admin = principal(1);
        let owner = principal(2);
        let registry = AgentRegistry::new(admin).unwrap();
        let id = registry.register_agent(admin, owner, "e", "m").unwrap();

        assert!(matches!(
            registry.transfer_from(admin, owner, principal(3), id),
            Err(RegistryError::NotAuthorized { .. })
        ));
    }

    #[test]
    fn test_renounce_requires_confirmation() {
        let admin = principal(1);
        let registry = AgentRegistry::new(admin).unwrap();
        assert_eq!(
            registry.renounce_role(admin, &Role::admin(), principal(2)),
            Err(RegistryError::BadConfirmation)
        );
        registry
            .renounce_role(admin, &Role::admin(), admin)
            .unwrap();
        assert!(!registry.has_role(&Role::admin(), admin));
    }

    #[test]
    fn test_redundant_grant_is_silent() {
        let admin = principal(1);
        let registry = AgentRegistry::new(admin).unwrap();
        let before = registry.last_event_sequence();
        registry.grant_role(admin, &Role::admin(), admin).unwrap();
        assert_eq!(registry.last_event_sequence(), before);
    }
}
