//! Token ledger: records, ownership index, approvals
//!
//! The ledger performs no authorization. It only enforces the structural
//! rules of the token set (existence, id assignment, index bounds) and is
//! always driven from inside the registry lock.

use crate::error::{RegistryError, Result};
use autonomix_types::{AgentId, AgentRecord, Principal};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone)]
pub struct TokenLedger {
    records: BTreeMap<AgentId, AgentRecord>,
    owned: HashMap<Principal, BTreeSet<AgentId>>,
    approvals: HashMap<AgentId, Principal>,
    operators: HashMap<Principal, BTreeSet<Principal>>,
    next_id: AgentId,
}

impl Default for TokenLedger {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            owned: HashMap::new(),
            approvals: HashMap::new(),
            operators: HashMap::new(),
            next_id: AgentId::FIRST,
        }
    }
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next mint will receive
    pub fn next_id(&self) -> AgentId {
        self.next_id
    }

    pub fn exists(&self, id: AgentId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn get(&self, id: AgentId) -> Result<&AgentRecord> {
        self.records
            .get(&id)
            .ok_or(RegistryError::TokenNonexistent(id))
    }

    pub fn get_mut(&mut self, id: AgentId) -> Result<&mut AgentRecord> {
        self.records
            .get_mut(&id)
            .ok_or(RegistryError::TokenNonexistent(id))
    }

    pub fn owner_of(&self, id: AgentId) -> Result<Principal> {
        self.get(id).map(|record| record.owner)
    }

    /// Create a record owned by `to` with zero reputation.
    ///
    /// The id counter only advances when the mint succeeds.
    pub fn mint(&mut self, to: Principal, endpoint: String, metadata_uri: String) -> Result<AgentId> {
        if to.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        let id = self.next_id;
        let next = id.checked_next().ok_or(RegistryError::IdExhausted)?;

        self.records.insert(
            id,
            AgentRecord {
                id,
                owner: to,
                endpoint,
                metadata_uri,
                reputation: 0,
            },
        );
        self.owned.entry(to).or_default().insert(id);
        self.next_id = next;
        Ok(id)
    }

    /// Remove a record and its single-token approval
    pub fn burn(&mut self, id: AgentId) -> Result<AgentRecord> {
        let record = self
            .records
            .remove(&id)
            .ok_or(RegistryError::TokenNonexistent(id))?;
        self.unindex(&record.owner, id);
        self.approvals.remove(&id);
        Ok(record)
    }

    /// Move ownership to `to`, clearing the single-token approval
    pub fn transfer(&mut self, id: AgentId, to: Principal) -> Result<Principal> {
        if to.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        let record = self.get_mut(id)?;
        let from = record.owner;
        record.owner = to;

        self.unindex(&from, id);
        self.owned.entry(to).or_default().insert(id);
        self.approvals.remove(&id);
        Ok(from)
    }

    fn unindex(&mut self, owner: &Principal, id: AgentId) {
        if let Some(set) = self.owned.get_mut(owner) {
            set.remove(&id);
            if set.is_empty() {
                self.owned.remove(owner);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Approvals
    // ─────────────────────────────────────────────────────────────────────

    pub fn set_approval(&mut self, id: AgentId, approved: Option<Principal>) -> Result<()> {
        self.get(id)?;
        match approved {
            Some(principal) if !principal.is_zero() => {
                self.approvals.insert(id, principal);
            }
            _ => {
                self.approvals.remove(&id);
            }
        }
        Ok(())
    }

    pub fn approved(&self, id: AgentId) -> Result<Option<Principal>> {
        self.get(id)?;
        Ok(self.approvals.get(&id).copied())
    }

    pub fn set_operator(&mut self, owner: Principal, operator: Principal, approved: bool) {
        if approved {
            self.operators.entry(owner).or_default().insert(operator);
        } else if let Some(set) = self.operators.get_mut(&owner) {
            set.remove(&operator);
            if set.is_empty() {
                self.operators.remove(&owner);
            }
        }
    }

    pub fn is_operator(&self, owner: &Principal, operator: &Principal) -> bool {
        self.operators
            .get(owner)
            .map(|set| set.contains(operator))
            .unwrap_or(false)
    }

    /// Owner, single-token approval, or operator of the owner
    pub fn can_transfer(&self, caller: &Principal, id: AgentId) -> Result<bool> {
        let owner = self.owner_of(id)?;
        Ok(owner == *caller
            || self.approvals.get(&id) == Some(caller)
            || self.is_operator(&owner, caller))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Enumeration
    // ─────────────────────────────────────────────────────────────────────

    pub fn total_supply(&self) -> usize {
        self.records.len()
    }

    pub fn balance_of(&self, owner: &Principal) -> usize {
        self.owned.get(owner).map(BTreeSet::len).unwrap_or(0)
    }

    pub fn token_by_index(&self, index: usize) -> Result<AgentId> {
        self.records
            .keys()
            .nth(index)
            .copied()
            .ok_or(RegistryError::OutOfBoundsIndex {
                index,
                len: self.records.len(),
            })
    }

    pub fn token_of_owner_by_index(&self, owner: &Principal, index: usize) -> Result<AgentId> {
        let owned = self.owned.get(owner);
        owned
            .and_then(|set| set.iter().nth(index).copied())
            .ok_or(RegistryError::OutOfBoundsIndex {
                index,
                len: owned.map(BTreeSet::len).unwrap_or(0),
            })
    }

    pub fn tokens_of(&self, owner: &Principal) -> Vec<AgentId> {
        self.owned
            .get(owner)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Live records in ascending id order
    pub fn records(&self) -> impl Iterator<Item = &AgentRecord> {
        self.records.values()
    }
}
