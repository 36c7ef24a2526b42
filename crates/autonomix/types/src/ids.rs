//! Strongly-typed identifiers for registry entities
//!
//! Principals are 20-byte identities rendered as `0x`-prefixed hex; agent ids
//! are positive integers wrapped in a newtype so they cannot be confused with
//! indices or counts.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of a principal in bytes
pub const PRINCIPAL_LEN: usize = 20;

/// An identity capable of issuing calls and holding roles or tokens.
///
/// The all-zero principal is the null principal: it never owns a token and
/// never holds a role.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Principal([u8; PRINCIPAL_LEN]);

impl Principal {
    /// The null principal
    pub const ZERO: Principal = Principal([0u8; PRINCIPAL_LEN]);

    pub const fn from_bytes(bytes: [u8; PRINCIPAL_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PRINCIPAL_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; PRINCIPAL_LEN]
    }
}

impl Default for Principal {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({})", self)
    }
}

/// Error parsing a principal from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePrincipalError {
    #[error("principal must start with 0x: {0}")]
    MissingPrefix(String),

    #[error("principal must be {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("principal contains non-hex characters: {0}")]
    InvalidHex(String),
}

impl FromStr for Principal {
    type Err = ParsePrincipalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| ParsePrincipalError::MissingPrefix(trimmed.to_string()))?;

        if digits.len() != PRINCIPAL_LEN * 2 {
            return Err(ParsePrincipalError::InvalidLength {
                expected: PRINCIPAL_LEN * 2,
                actual: digits.len(),
            });
        }

        let mut bytes = [0u8; PRINCIPAL_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| ParsePrincipalError::InvalidHex(trimmed.to_string()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Identifier of an agent token.
///
/// Ids are assigned from 1 upward and never reused, even after a burn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(u64);

impl AgentId {
    /// The first id a fresh registry hands out
    pub const FIRST: AgentId = AgentId(1);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    /// The id following this one, or `None` when the id space is exhausted
    pub fn checked_next(&self) -> Option<AgentId> {
        self.0.checked_add(1).map(AgentId)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error parsing an agent id from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid agent id: {0}")]
pub struct ParseAgentIdError(String);

impl FromStr for AgentId {
    type Err = ParseAgentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        match digits.parse::<u64>() {
            Ok(0) | Err(_) => Err(ParseAgentIdError(trimmed.to_string())),
            Ok(id) => Ok(Self(id)),
        }
    }
}

impl From<u64> for AgentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
