//! Property tests: registry invariants under arbitrary operation sequences.
//!
//! Ids are strictly increasing and never reused, burned ids read as
//! nonexistent, failures leave state untouched, and the event stream is
//! gap-free.

use autonomix_registry::{AgentRegistry, RegistryError};
use autonomix_types::{AgentId, Principal};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Op {
    Register { owner: u8 },
    Burn { id: u64, caller: u8 },
    Reputation { id: u64, delta: i64 },
    Metadata { id: u64, caller: u8, empty: bool },
    TogglePause,
}

const ADMIN: u8 = 1;

fn principal(byte: u8) -> Principal {
    Principal::from_bytes([byte; 20])
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..4).prop_map(|owner| Op::Register { owner }),
        (1u64..12, 0u8..4).prop_map(|(id, caller)| Op::Burn { id, caller }),
        (1u64..12, any::<i64>()).prop_map(|(id, delta)| Op::Reputation { id, delta }),
        (1u64..12, 0u8..4, any::<bool>())
            .prop_map(|(id, caller, empty)| Op::Metadata { id, caller, empty }),
        Just(Op::TogglePause),
    ]
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Minted ids strictly increase, burned ids never come back.
    #[test]
    fn ids_monotonic_and_burn_is_final(ops in prop::collection::vec(arb_op(), 1..60)) {
        let admin = principal(ADMIN);
        let registry = AgentRegistry::new(admin).unwrap();
        let mut minted: Vec<AgentId> = Vec::new();
        let mut burned: Vec<AgentId> = Vec::new();

        for op in ops {
            match op {
                Op::Register { owner } => {
                    let before = registry.next_agent_id();
                    match registry.register_agent(admin, principal(owner), "https://a", "ipfs://m") {
                        Ok(id) => {
                            prop_assert_eq!(id, before);
                            if let Some(last) = minted.last() {
                                prop_assert!(id > *last);
                            }
                            minted.push(id);
                        }
                        Err(_) => prop_assert_eq!(registry.next_agent_id(), before),
                    }
                }
                Op::Burn { id, caller } => {
                    let id = AgentId::new(id);
                    if registry.burn(principal(caller), id).is_ok() {
                        burned.push(id);
                    }
                }
                Op::Reputation { id, delta } => {
                    let _ = registry.update_reputation(admin, AgentId::new(id), delta as i128);
                }
                Op::Metadata { id, caller, empty } => {
                    let endpoint = if empty { "" } else { "https://b" };
                    let _ = registry.set_agent_metadata(principal(caller), AgentId::new(id), endpoint, "ipfs://n");
                }
                Op::TogglePause => {
                    if registry.paused() {
                        registry.unpause(admin).unwrap();
                    } else {
                        registry.pause(admin).unwrap();
                    }
                }
            }

            for id in &burned {
                prop_assert!(!registry.exists(*id));
                prop_assert_eq!(registry.get_agent(*id), Err(RegistryError::TokenNonexistent(*id)));
            }
        }

        prop_assert_eq!(registry.total_supply(), minted.len() - burned.len());
    }

    /// Failed metadata updates leave the record unchanged.
    #[test]
    fn failed_mutation_is_atomic(caller in 0u8..6, empty_endpoint in any::<bool>(), empty_uri in any::<bool>()) {
        let admin = principal(ADMIN);
        let owner = principal(2);
        let registry = AgentRegistry::new(admin).unwrap();
        let id = registry.register_agent(admin, owner, "https://a", "ipfs://m").unwrap();
        let before = registry.agent_record(id).unwrap();
        let sequence_before = registry.last_event_sequence();

        let endpoint = if empty_endpoint { "" } else { "https://b" };
        let uri = if empty_uri { "" } else { "ipfs://n" };
        if registry.set_agent_metadata(principal(caller), id, endpoint, uri).is_err() {
            prop_assert_eq!(registry.agent_record(id).unwrap(), before);
            prop_assert_eq!(registry.last_event_sequence(), sequence_before);
        }
    }

    /// Every committed mutation is observed once, in order, without gaps.
    #[test]
    fn event_sequence_gap_free(deltas in prop::collection::vec(-50i128..50, 1..40)) {
        let admin = principal(ADMIN);
        let registry = AgentRegistry::new(admin).unwrap();
        let id = registry.register_agent(admin, admin, "https://a", "ipfs://m").unwrap();
        let mut rx = registry.subscribe();
        let start = registry.last_event_sequence();

        let mut expected = 0u128;
        for delta in &deltas {
            expected = if *delta >= 0 {
                expected + *delta as u128
            } else {
                expected.saturating_sub(delta.unsigned_abs())
            };
            prop_assert_eq!(registry.update_reputation(admin, id, *delta).unwrap(), expected);
        }

        for offset in 1..=deltas.len() as u64 {
            let envelope = rx.try_recv().unwrap();
            prop_assert_eq!(envelope.sequence, start + offset);
        }
        prop_assert!(rx.try_recv().is_err());
    }
}
