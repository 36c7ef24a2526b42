//! Named roles for role-based access control

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named capability grant, independent of any single token's ownership.
///
/// `DEFAULT_ADMIN_ROLE` is the administrative role: it mints, pauses, manages
/// every other role and may modify or burn tokens it does not own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Name of the administrative role
    pub const ADMIN_NAME: &'static str = "DEFAULT_ADMIN_ROLE";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn admin() -> Self {
        Self(Self::ADMIN_NAME.to_string())
    }

    pub fn is_admin(&self) -> bool {
        self.0 == Self::ADMIN_NAME
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_role() {
        assert!(Role::admin().is_admin());
        assert!(!Role::new("REPUTATION_ORACLE").is_admin());
        assert_eq!(Role::admin().to_string(), "DEFAULT_ADMIN_ROLE");
    }
}
