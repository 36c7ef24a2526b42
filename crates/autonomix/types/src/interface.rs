//! Capability fingerprints
//!
//! An [`InterfaceId`] is a 4-byte identifier for an operation set. Clients
//! probe a registry with `supportsInterface` to learn which sets it exposes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 4-byte interface identifier, rendered as `0x` + 8 hex digits
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceId([u8; 4]);

impl InterfaceId {
    /// Reserved id that no implementation may claim to support
    pub const INVALID: InterfaceId = InterfaceId([0xff; 4]);

    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub const fn from_u32(value: u32) -> Self {
        Self(value.to_be_bytes())
    }

    pub const fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl std::ops::BitXor for InterfaceId {
    type Output = InterfaceId;

    fn bitxor(self, rhs: Self) -> Self::Output {
        InterfaceId::from_u32(self.as_u32() ^ rhs.as_u32())
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.as_u32())
    }
}

impl fmt::Debug for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InterfaceId({})", self)
    }
}

/// Error parsing an interface id
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("interface id must be 0x followed by 8 hex digits: {0}")]
pub struct ParseInterfaceIdError(String);

impl FromStr for InterfaceId {
    type Err = ParseInterfaceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| ParseInterfaceIdError(trimmed.to_string()))?;
        if digits.len() != 8 {
            return Err(ParseInterfaceIdError(trimmed.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(InterfaceId::from_u32)
            .map_err(|_| ParseInterfaceIdError(trimmed.to_string()))
    }
}

impl Serialize for InterfaceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InterfaceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_eight_digits() {
        assert_eq!(InterfaceId::from_u32(0x01ffc9a7).to_string(), "0x01ffc9a7");
    }

    #[test]
    fn test_parse() {
        let id: InterfaceId = "0x80AC58CD".parse().unwrap();
        assert_eq!(id.as_u32(), 0x80ac58cd);
        assert!("80ac58cd".parse::<InterfaceId>().is_err());
        assert!("0x80ac58".parse::<InterfaceId>().is_err());
        assert!("0x80ac58cz".parse::<InterfaceId>().is_err());
    }

    #[test]
    fn test_xor() {
        let a = InterfaceId::from_u32(0xf0f0_0000);
        let b = InterfaceId::from_u32(0x0ff0_00ff);
        assert_eq!((a ^ b).as_u32(), 0xff00_00ff);
    }
}
