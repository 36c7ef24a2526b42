//! Integration tests: agent token lifecycle through the public registry API.
//!
//! Covers registration, metadata mutation, reputation clamping, burn, the
//! pause switch, ownership transfer and the event stream.

use autonomix_registry::{AgentRegistry, RegistryError};
use autonomix_types::{
    AgentId, InterfaceId, Principal, RegistryEvent, RegistryEventEnvelope, Role,
};
use tokio::sync::broadcast::{error::TryRecvError, Receiver};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn principal(byte: u8) -> Principal {
    Principal::from_bytes([byte; 20])
}

const ADMIN: u8 = 0xa1;
const OWNER: u8 = 0xb2;
const STRANGER: u8 = 0xc3;

fn setup() -> (AgentRegistry, Principal, Principal, Principal) {
    let admin = principal(ADMIN);
    let registry = AgentRegistry::new(admin).unwrap();
    (registry, admin, principal(OWNER), principal(STRANGER))
}

fn drain_kinds(rx: &mut Receiver<RegistryEventEnvelope>) -> Vec<&'static str> {
    let mut kinds = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(envelope) => kinds.push(envelope.event.kind()),
            Err(TryRecvError::Empty) => break,
            Err(other) => panic!("unexpected receive error: {other:?}"),
        }
    }
    kinds
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn register_assigns_data_and_requires_admin() {
    let (registry, admin, owner, stranger) = setup();
    let mut rx = registry.subscribe();

    let id = registry
        .register_agent(admin, owner, "https://agent.autonomix.xyz", "ipfs://QmMeta")
        .unwrap();
    assert_eq!(id, AgentId::new(1));

    assert_eq!(registry.owner_of(id).unwrap(), owner);
    assert_eq!(registry.agent_endpoint(id).unwrap(), "https://agent.autonomix.xyz");
    assert_eq!(registry.agent_metadata_uri(id).unwrap(), "ipfs://QmMeta");
    let view = registry.get_agent(id).unwrap();
    assert_eq!(view.endpoint, "https://agent.autonomix.xyz");
    assert_eq!(view.reputation, 0);

    let registered = loop {
        let envelope = rx.try_recv().unwrap();
        if let RegistryEvent::AgentRegistered { .. } = envelope.event {
            break envelope.event;
        }
    };
    assert_eq!(
        registered,
        RegistryEvent::AgentRegistered {
            agent_id: id,
            owner,
            endpoint: "https://agent.autonomix.xyz".into(),
            metadata_uri: "ipfs://QmMeta".into(),
        }
    );

    let denied = registry.register_agent(stranger, owner, "https://a", "ipfs://m");
    assert!(matches!(
        denied,
        Err(RegistryError::AccessControlUnauthorized { account, .. }) if account == stranger
    ));
    assert_eq!(registry.next_agent_id(), AgentId::new(2));
}

#[test]
fn set_metadata_owner_or_admin() {
    let (registry, admin, owner, stranger) = setup();
    let id = registry.register_agent(admin, owner, "https://a", "ipfs://m").unwrap();

    registry.set_agent_metadata(owner, id, "https://b", "ipfs://n").unwrap();
    assert_eq!(registry.agent_endpoint(id).unwrap(), "https://b");
    assert_eq!(registry.agent_metadata_uri(id).unwrap(), "ipfs://n");

    registry.set_agent_metadata(admin, id, "https://c", "ipfs://o").unwrap();
    assert_eq!(registry.agent_endpoint(id).unwrap(), "https://c");

    assert!(matches!(
        registry.set_agent_metadata(stranger, id, "https://x", "ipfs://y"),
        Err(RegistryError::NotAuthorized { .. })
    ));
    assert_eq!(
        registry.set_agent_metadata(owner, id, "", "ipfs://z"),
        Err(RegistryError::InvalidMetadata { field: "endpoint" })
    );
    assert_eq!(
        registry.set_agent_metadata(owner, id, "https://x", ""),
        Err(RegistryError::InvalidMetadata { field: "metadataURI" })
    );
    assert_eq!(
        registry.set_agent_metadata(owner, AgentId::new(999), "https://x", "ipfs://y"),
        Err(RegistryError::TokenNonexistent(AgentId::new(999)))
    );

    // failed calls left the last good values in place
    assert_eq!(registry.agent_endpoint(id).unwrap(), "https://c");
    assert_eq!(registry.agent_metadata_uri(id).unwrap(), "ipfs://o");
}

#[test]
fn reputation_accumulates_and_clamps() {
    let (registry, admin, owner, stranger) = setup();
    let id = registry.register_agent(admin, owner, "https://a", "ipfs://m").unwrap();
    let mut rx = registry.subscribe();

    assert_eq!(registry.update_reputation(stranger, id, 10).unwrap(), 10);
    assert_eq!(registry.update_reputation(stranger, id, -3).unwrap(), 7);
    assert_eq!(registry.update_reputation(stranger, id, -20).unwrap(), 0);
    assert_eq!(registry.reputation_of(id).unwrap(), 0);

    let updates: Vec<RegistryEvent> = (0..3).map(|_| rx.try_recv().unwrap().event).collect();
    assert_eq!(
        updates[2],
        RegistryEvent::ReputationUpdated {
            agent_id: id,
            old_reputation: 7,
            new_reputation: 0,
            delta: -20,
        }
    );

    assert_eq!(
        registry.update_reputation(stranger, AgentId::new(999), 1),
        Err(RegistryError::TokenNonexistent(AgentId::new(999)))
    );
    assert_eq!(
        registry.update_reputation(stranger, id, i128::MIN),
        Err(RegistryError::InvalidDeltaMin)
    );
}

#[test]
fn min_delta_leaves_nonzero_reputation_untouched() {
    let (registry, admin, owner, stranger) = setup();
    let id = registry.register_agent(admin, owner, "https://a", "ipfs://m").unwrap();
    assert_eq!(registry.update_reputation(stranger, id, 42).unwrap(), 42);

    let sequence = registry.last_event_sequence();
    let mut rx = registry.subscribe();

    assert_eq!(
        registry.update_reputation(stranger, id, i128::MIN),
        Err(RegistryError::InvalidDeltaMin)
    );
    assert_eq!(registry.reputation_of(id).unwrap(), 42);
    assert_eq!(registry.last_event_sequence(), sequence);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    // the most negative representable delta still clamps normally
    assert_eq!(registry.update_reputation(stranger, id, i128::MIN + 1).unwrap(), 0);
}

#[test]
fn burn_removes_record_and_reads_fail() {
    let (registry, admin, owner, stranger) = setup();
    let id = registry.register_agent(admin, owner, "https://a", "ipfs://m").unwrap();

    assert!(matches!(
        registry.burn(stranger, id),
        Err(RegistryError::NotAuthorized { .. })
    ));

    registry.burn(owner, id).unwrap();

    let missing = Err(RegistryError::TokenNonexistent(id));
    assert_eq!(registry.agent_endpoint(id), missing.clone());
    assert_eq!(registry.agent_metadata_uri(id), missing.clone());
    assert_eq!(registry.token_uri(id), missing);
    assert_eq!(registry.reputation_of(id), Err(RegistryError::TokenNonexistent(id)));
    assert_eq!(registry.owner_of(id), Err(RegistryError::TokenNonexistent(id)));
    assert!(!registry.exists(id));

    // burned ids behave like never-minted ids and are never reused
    assert_eq!(
        registry.burn(admin, id),
        Err(RegistryError::TokenNonexistent(id))
    );
    let next = registry.register_agent(admin, owner, "https://a", "ipfs://m").unwrap();
    assert_eq!(next, AgentId::new(2));
}

#[test]
fn admin_can_burn_foreign_token() {
    let (registry, admin, owner, _) = setup();
    let id = registry.register_agent(admin, owner, "https://a", "ipfs://m").unwrap();
    registry.burn(admin, id).unwrap();
    assert_eq!(registry.total_supply(), 0);
    assert_eq!(registry.balance_of(owner).unwrap(), 0);
}

#[test]
fn pause_blocks_registration_only() {
    let (registry, admin, owner, stranger) = setup();
    let id = registry.register_agent(admin, owner, "https://a", "ipfs://m").unwrap();

    assert!(matches!(
        registry.pause(stranger),
        Err(RegistryError::AccessControlUnauthorized { .. })
    ));

    registry.pause(admin).unwrap();
    assert!(registry.paused());
    assert_eq!(
        registry.register_agent(admin, owner, "https://x", "ipfs://y"),
        Err(RegistryError::EnforcedPause)
    );

    // other mutations are unaffected
    registry.set_agent_metadata(owner, id, "https://b", "ipfs://n").unwrap();
    registry.update_reputation(owner, id, 5).unwrap();

    registry.unpause(admin).unwrap();
    let mut rx = registry.subscribe();
    registry.register_agent(admin, owner, "https://x", "ipfs://y").unwrap();
    assert!(drain_kinds(&mut rx).contains(&"AgentRegistered"));
}

#[test]
fn transfer_moves_ownership_and_clears_approval() {
    let (registry, admin, owner, stranger) = setup();
    let buyer = principal(0xd4);
    let id = registry.register_agent(admin, owner, "https://a", "ipfs://m").unwrap();

    assert!(matches!(
        registry.approve(stranger, Some(stranger), id),
        Err(RegistryError::NotAuthorized { .. })
    ));
    registry.approve(owner, Some(stranger), id).unwrap();
    assert_eq!(registry.get_approved(id).unwrap(), Some(stranger));

    assert!(matches!(
        registry.transfer_from(stranger, buyer, principal(0xe5), id),
        Err(RegistryError::IncorrectOwner { .. })
    ));
    assert_eq!(
        registry.transfer_from(stranger, owner, Principal::ZERO, id),
        Err(RegistryError::ZeroAddress)
    );

    registry.transfer_from(stranger, owner, buyer, id).unwrap();
    assert_eq!(registry.owner_of(id).unwrap(), buyer);
    assert_eq!(registry.get_approved(id).unwrap(), None);
    assert_eq!(registry.balance_of(buyer).unwrap(), 1);
    assert_eq!(registry.token_of_owner_by_index(buyer, 0).unwrap(), id);

    // previous owner lost metadata rights
    assert!(matches!(
        registry.set_agent_metadata(owner, id, "https://x", "ipfs://y"),
        Err(RegistryError::NotAuthorized { .. })
    ));
}

#[test]
fn operator_may_transfer() {
    let (registry, admin, owner, stranger) = setup();
    let id = registry.register_agent(admin, owner, "https://a", "ipfs://m").unwrap();

    assert_eq!(
        registry.set_approval_for_all(owner, Principal::ZERO, true),
        Err(RegistryError::ZeroAddress)
    );
    registry.set_approval_for_all(owner, stranger, true).unwrap();
    assert!(registry.is_approved_for_all(owner, stranger));

    registry.transfer_from(stranger, owner, stranger, id).unwrap();
    assert_eq!(registry.owner_of(id).unwrap(), stranger);
}

#[test]
fn role_management_changes_admin_power() {
    let (registry, admin, owner, stranger) = setup();

    assert!(matches!(
        registry.grant_role(stranger, &Role::admin(), stranger),
        Err(RegistryError::AccessControlUnauthorized { .. })
    ));

    registry.grant_role(admin, &Role::admin(), stranger).unwrap();
    registry.register_agent(stranger, owner, "https://a", "ipfs://m").unwrap();

    registry.revoke_role(admin, &Role::admin(), stranger).unwrap();
    assert!(matches!(
        registry.register_agent(stranger, owner, "https://a", "ipfs://m"),
        Err(RegistryError::AccessControlUnauthorized { .. })
    ));
    assert_eq!(registry.get_role_admin(&Role::new("ANY")), Role::admin());
}

#[test]
fn introspection() {
    let (registry, _, _, _) = setup();
    assert!(registry.supports_interface(InterfaceId::from_u32(0x01ffc9a7)));
    assert!(registry.supports_interface(InterfaceId::from_u32(0x80ac58cd)));
    assert!(registry.supports_interface(InterfaceId::from_u32(0x91e84ed2)));
    assert!(!registry.supports_interface(InterfaceId::INVALID));
}

#[test]
fn list_and_enumerate() {
    let (registry, admin, owner, stranger) = setup();
    for _ in 0..3 {
        registry.register_agent(admin, owner, "https://a", "ipfs://m").unwrap();
    }
    registry.register_agent(admin, stranger, "https://s", "ipfs://s").unwrap();
    registry.burn(owner, AgentId::new(2)).unwrap();

    let ids: Vec<u64> = registry.list_agents().iter().map(|r| r.id.get()).collect();
    assert_eq!(ids, vec![1, 3, 4]);
    assert_eq!(registry.total_supply(), 3);
    assert_eq!(registry.token_by_index(1).unwrap(), AgentId::new(3));
    assert_eq!(registry.tokens_of(owner), vec![AgentId::new(1), AgentId::new(3)]);
    assert_eq!(registry.balance_of(Principal::ZERO), Err(RegistryError::ZeroAddress));
    assert_eq!(registry.next_agent_id(), AgentId::new(5));
}
