//! Entry validation and CO2e computation.

use rust_decimal::Decimal;

use crate::catalog::SourceInfo;

use super::error::LedgerError;
use super::types::{NewEntryInput, ResolvedEntry, MAX_REPORTING_YEAR, MIN_REPORTING_YEAR};

/// Computes CO2e from an activity quantity and an emission factor.
///
/// Exact decimal multiplication, no rounding: the stored `co2e` must
/// always be recomputable from the two stored decimals, even for
/// factors with ten fractional digits.
#[must_use]
pub fn compute_co2e(quantity: Decimal, factor: Decimal) -> Decimal {
    quantity * factor
}

/// Extracts the year from a reporting period token.
///
/// The token's first four characters must parse as a year; suffixes
/// like "-Q1" or "-H2" are permitted and ignored here.
#[must_use]
pub fn reporting_period_year(period: &str) -> Option<i32> {
    period.trim().get(..4)?.parse().ok()
}

/// Stateless service validating and resolving new ledger entries.
///
/// Pure logic over pre-fetched data: the repository resolves the
/// source and organization state, and this service decides.
pub struct LedgerService;

impl LedgerService {
    /// Validates an entry and resolves its factor snapshot.
    ///
    /// Steps:
    /// 1. Organization must be verified.
    /// 2. Source must be active and visible to the organization.
    /// 3. Quantity must be positive.
    /// 4. Reporting period must start with a year in [1900, 2100].
    /// 5. CO2e is computed from the source's *current* factor, which
    ///    becomes the entry's permanent snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] describing the first violated rule.
    pub fn resolve_entry(
        input: NewEntryInput,
        source: &SourceInfo,
        organization_verified: bool,
    ) -> Result<ResolvedEntry, LedgerError> {
        if !organization_verified {
            return Err(LedgerError::OrganizationNotVerified(input.organization_id));
        }

        if let Some(owner) = source.organization_id {
            if owner != input.organization_id {
                return Err(LedgerError::SourceOrganizationMismatch {
                    source_id: source.id,
                    organization_id: input.organization_id,
                });
            }
        }

        if !source.is_active {
            return Err(LedgerError::SourceInactive(source.id));
        }

        if input.quantity <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveQuantity);
        }

        let period = input.reporting_period.trim();
        if period.is_empty() {
            return Err(LedgerError::EmptyPeriod);
        }
        match reporting_period_year(period) {
            Some(year) if (MIN_REPORTING_YEAR..=MAX_REPORTING_YEAR).contains(&year) => {}
            _ => {
                return Err(LedgerError::PeriodOutOfRange {
                    period: period.to_string(),
                })
            }
        }

        let factor_value_at_entry = source.factor_value;
        let co2e = compute_co2e(input.quantity, factor_value_at_entry);

        Ok(ResolvedEntry {
            organization_id: input.organization_id,
            source_id: source.id,
            quantity: input.quantity,
            unit: input.unit,
            factor_value_at_entry,
            co2e,
            reporting_period: period.to_string(),
            entered_by: input.entered_by,
            notes: input.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SourceKind;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn grid_electricity() -> SourceInfo {
        SourceInfo {
            id: Uuid::new_v4(),
            code: "S2-ELEC-001".to_string(),
            factor_value: dec!(0.4085),
            unit: "kg CO2e/kWh".to_string(),
            is_active: true,
            kind: SourceKind::System,
            organization_id: None,
        }
    }

    fn input(quantity: Decimal, period: &str) -> NewEntryInput {
        NewEntryInput {
            organization_id: Uuid::new_v4(),
            source_id: Uuid::nil(),
            quantity,
            unit: "kWh".to_string(),
            reporting_period: period.to_string(),
            entered_by: Uuid::new_v4(),
            notes: None,
        }
    }

    #[test]
    fn test_resolve_snapshots_factor_and_computes_co2e() {
        let source = grid_electricity();
        let resolved =
            LedgerService::resolve_entry(input(dec!(1000), "2024"), &source, true).unwrap();
        assert_eq!(resolved.factor_value_at_entry, dec!(0.4085));
        assert_eq!(resolved.co2e, dec!(408.5000));
        assert_eq!(resolved.co2e, resolved.quantity * resolved.factor_value_at_entry);
        assert_eq!(resolved.source_id, source.id);
    }

    #[test]
    fn test_resolve_rejects_unverified_organization() {
        let source = grid_electricity();
        let entry = input(dec!(10), "2024");
        let org_id = entry.organization_id;
        assert_eq!(
            LedgerService::resolve_entry(entry, &source, false),
            Err(LedgerError::OrganizationNotVerified(org_id))
        );
    }

    #[test]
    fn test_resolve_rejects_inactive_source() {
        let mut source = grid_electricity();
        source.is_active = false;
        assert_eq!(
            LedgerService::resolve_entry(input(dec!(10), "2024"), &source, true),
            Err(LedgerError::SourceInactive(source.id))
        );
    }

    #[test]
    fn test_resolve_rejects_foreign_custom_source() {
        let mut source = grid_electricity();
        source.kind = SourceKind::Custom;
        source.organization_id = Some(Uuid::new_v4());
        let result = LedgerService::resolve_entry(input(dec!(10), "2024"), &source, true);
        assert!(matches!(
            result,
            Err(LedgerError::SourceOrganizationMismatch { .. })
        ));
    }

    #[test]
    fn test_resolve_rejects_non_positive_quantity() {
        let source = grid_electricity();
        assert_eq!(
            LedgerService::resolve_entry(input(Decimal::ZERO, "2024"), &source, true),
            Err(LedgerError::NonPositiveQuantity)
        );
        assert_eq!(
            LedgerService::resolve_entry(input(dec!(-5), "2024"), &source, true),
            Err(LedgerError::NonPositiveQuantity)
        );
    }

    #[test]
    fn test_resolve_rejects_bad_periods() {
        let source = grid_electricity();
        assert_eq!(
            LedgerService::resolve_entry(input(dec!(1), "  "), &source, true),
            Err(LedgerError::EmptyPeriod)
        );
        for bad in ["1899", "2101", "Q1-2024", "20"] {
            assert_eq!(
                LedgerService::resolve_entry(input(dec!(1), bad), &source, true),
                Err(LedgerError::PeriodOutOfRange {
                    period: bad.to_string()
                }),
                "period {bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_resolve_accepts_period_suffixes() {
        let source = grid_electricity();
        for good in ["1900", "2100", "2024-Q1", "2024-H2", " 2024 "] {
            let resolved =
                LedgerService::resolve_entry(input(dec!(1), good), &source, true).unwrap();
            assert_eq!(resolved.reporting_period, good.trim());
        }
    }

    #[test]
    fn test_reporting_period_year() {
        assert_eq!(reporting_period_year("2024"), Some(2024));
        assert_eq!(reporting_period_year("2024-Q3"), Some(2024));
        assert_eq!(reporting_period_year("abcd"), None);
        assert_eq!(reporting_period_year(""), None);
        assert_eq!(reporting_period_year("24"), None);
    }

    #[test]
    fn test_high_precision_factor_no_drift() {
        let mut source = grid_electricity();
        source.factor_value = dec!(0.1234567891); // 10 fractional digits
        let resolved =
            LedgerService::resolve_entry(input(dec!(3.7), "2025"), &source, true).unwrap();
        assert_eq!(resolved.co2e, dec!(0.45679011967));
    }
}
