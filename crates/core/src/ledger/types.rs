//! Ledger domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Scope;
use crate::verification::VerificationStatus;

/// Earliest accepted reporting-period year.
pub const MIN_REPORTING_YEAR: i32 = 1900;

/// Latest accepted reporting-period year.
pub const MAX_REPORTING_YEAR: i32 = 2100;

/// Input for recording a new activity entry.
#[derive(Debug, Clone)]
pub struct NewEntryInput {
    /// The owning organization.
    pub organization_id: Uuid,
    /// The referenced emission source.
    pub source_id: Uuid,
    /// Activity quantity in the source's unit.
    pub quantity: Decimal,
    /// Activity unit as captured, e.g. "kWh".
    pub unit: String,
    /// Free-form reporting period token starting with a year,
    /// e.g. "2024", "2024-Q1".
    pub reporting_period: String,
    /// The user recording the entry.
    pub entered_by: Uuid,
    /// Optional free-form notes.
    pub notes: Option<String>,
}

/// A validated entry ready for persistence.
///
/// `factor_value_at_entry` is the snapshot taken from the live source
/// at resolution time; `co2e` is always exactly
/// `quantity * factor_value_at_entry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// The owning organization.
    pub organization_id: Uuid,
    /// The referenced emission source.
    pub source_id: Uuid,
    /// Activity quantity.
    pub quantity: Decimal,
    /// Activity unit.
    pub unit: String,
    /// The factor value copied from the source, write-once.
    pub factor_value_at_entry: Decimal,
    /// Computed CO2e, derivable from the two stored decimals.
    pub co2e: Decimal,
    /// Reporting period token.
    pub reporting_period: String,
    /// The user recording the entry.
    pub entered_by: Uuid,
    /// Optional notes.
    pub notes: Option<String>,
}

/// Filters for ledger reads.
///
/// Absence of a filter means "no constraint", not a default value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFilter {
    /// Restrict to a reporting period token.
    pub period: Option<String>,
    /// Restrict to a scope.
    pub scope: Option<Scope>,
    /// Restrict to a verification status.
    pub status: Option<VerificationStatus>,
}

impl EntryFilter {
    /// A filter with no constraints.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Stable key fragment for cache lookups.
    #[must_use]
    pub fn cache_key_part(&self) -> String {
        format!(
            "p={}|s={}|v={}",
            self.period.as_deref().unwrap_or("*"),
            self.scope.map_or_else(|| "*".to_string(), |s| s.to_string()),
            self.status.map_or("*", VerificationStatus::as_str),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_cache_key_distinguishes_constraints() {
        let unfiltered = EntryFilter::none();
        let by_period = EntryFilter {
            period: Some("2024".into()),
            ..EntryFilter::none()
        };
        let by_status = EntryFilter {
            status: Some(VerificationStatus::Unverified),
            ..EntryFilter::none()
        };
        assert_eq!(unfiltered.cache_key_part(), "p=*|s=*|v=*");
        assert_ne!(unfiltered.cache_key_part(), by_period.cache_key_part());
        assert_ne!(by_period.cache_key_part(), by_status.cache_key_part());
    }
}
