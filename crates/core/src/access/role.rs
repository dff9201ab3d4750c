//! User roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// User role in an organization.
///
/// Roles are ordered from lowest to highest privilege.
/// Higher roles can perform all actions of lower roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Can record activity data for their organization.
    NormalUser = 0,
    /// Can additionally verify entries and manage factors and goals.
    Manager = 1,
    /// Full access, including organization and user management.
    /// Admins may be unbound from any organization.
    Admin = 2,
}

impl Role {
    /// Parse a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal_user" => Some(Self::NormalUser),
            "manager" => Some(Self::Manager),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NormalUser => "normal_user",
            Self::Manager => "manager",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
