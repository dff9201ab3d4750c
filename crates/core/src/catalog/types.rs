//! Catalog domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// GHG-Protocol scope classification.
///
/// A fixed three-tier enumeration; categories belong to exactly one
/// scope and sources to exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Direct emissions from owned or controlled sources.
    Scope1,
    /// Indirect emissions from purchased energy.
    Scope2,
    /// All other value-chain emissions.
    Scope3,
}

impl Scope {
    /// Parse a scope from its number.
    pub const fn from_number(n: i16) -> Option<Self> {
        match n {
            1 => Some(Self::Scope1),
            2 => Some(Self::Scope2),
            3 => Some(Self::Scope3),
            _ => None,
        }
    }

    /// Returns the scope number (1, 2, or 3).
    #[must_use]
    pub const fn number(self) -> i16 {
        match self {
            Self::Scope1 => 1,
            Self::Scope2 => 2,
            Self::Scope3 => 3,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope_{}", self.number())
    }
}

/// Whether a source is shared system data or an organization's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Shipped with the catalog, shared across organizations.
    System,
    /// Created by a single organization for its own use.
    Custom,
}

/// Information about an emission source needed for validation.
///
/// Repositories fetch this once and hand it to the pure rules; the
/// ledger snapshots `factor_value` into each new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    /// The source ID.
    pub id: Uuid,
    /// Unique code within its owning scope (organization or system).
    pub code: String,
    /// The current emission factor (CO2e per unit of activity).
    pub factor_value: Decimal,
    /// Activity unit, e.g. "kg CO2e/kWh".
    pub unit: String,
    /// Whether the source may be referenced by new entries.
    pub is_active: bool,
    /// System or custom.
    pub kind: SourceKind,
    /// Owning organization for custom sources; None for system sources.
    pub organization_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_number() {
        assert_eq!(Scope::from_number(1), Some(Scope::Scope1));
        assert_eq!(Scope::from_number(2), Some(Scope::Scope2));
        assert_eq!(Scope::from_number(3), Some(Scope::Scope3));
        assert_eq!(Scope::from_number(0), None);
        assert_eq!(Scope::from_number(4), None);
    }

    #[test]
    fn test_scope_number_roundtrip() {
        for scope in [Scope::Scope1, Scope::Scope2, Scope::Scope3] {
            assert_eq!(Scope::from_number(scope.number()), Some(scope));
        }
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::Scope2.to_string(), "scope_2");
    }
}
