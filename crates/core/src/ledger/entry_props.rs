//! Property tests for entry resolution and CO2e arithmetic.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::catalog::{SourceInfo, SourceKind};

use super::entry::{compute_co2e, LedgerService};
use super::types::NewEntryInput;

fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    // Positive quantities up to 6 fractional digits.
    (1i64..1_000_000i64, 0u32..6u32).prop_map(|(units, scale)| Decimal::new(units, scale))
}

fn factor_strategy() -> impl Strategy<Value = Decimal> {
    // Positive factors up to 10 fractional digits, as published
    // conversion tables carry.
    (1i64..10_000_000_000i64, 0u32..10u32).prop_map(|(units, scale)| Decimal::new(units, scale))
}

fn source_with_factor(factor: Decimal) -> SourceInfo {
    SourceInfo {
        id: Uuid::new_v4(),
        code: "S1-FUEL-001".to_string(),
        factor_value: factor,
        unit: "kg CO2e/litre".to_string(),
        is_active: true,
        kind: SourceKind::System,
        organization_id: None,
    }
}

proptest! {
    /// The stored co2e is always recomputable from the two stored
    /// decimals, exactly.
    #[test]
    fn prop_co2e_recomputable(quantity in quantity_strategy(), factor in factor_strategy()) {
        let source = source_with_factor(factor);
        let input = NewEntryInput {
            organization_id: Uuid::new_v4(),
            source_id: source.id,
            quantity,
            unit: "unit".to_string(),
            reporting_period: "2024".to_string(),
            entered_by: Uuid::new_v4(),
            notes: None,
        };

        let resolved = LedgerService::resolve_entry(input, &source, true).unwrap();
        prop_assert_eq!(resolved.factor_value_at_entry, factor);
        prop_assert_eq!(
            resolved.co2e,
            compute_co2e(resolved.quantity, resolved.factor_value_at_entry)
        );
    }

    /// The snapshot is independent of later factor changes: resolving
    /// against a mutated source never alters a previously resolved entry.
    #[test]
    fn prop_snapshot_isolated_from_factor_edits(
        quantity in quantity_strategy(),
        factor_before in factor_strategy(),
        factor_after in factor_strategy(),
    ) {
        let mut source = source_with_factor(factor_before);
        let input = NewEntryInput {
            organization_id: Uuid::new_v4(),
            source_id: source.id,
            quantity,
            unit: "unit".to_string(),
            reporting_period: "2024-Q2".to_string(),
            entered_by: Uuid::new_v4(),
            notes: None,
        };

        let first = LedgerService::resolve_entry(input.clone(), &source, true).unwrap();

        // Catalog edit happens after the entry exists.
        source.factor_value = factor_after;
        let second = LedgerService::resolve_entry(input, &source, true).unwrap();

        prop_assert_eq!(first.factor_value_at_entry, factor_before);
        prop_assert_eq!(second.factor_value_at_entry, factor_after);
        prop_assert_eq!(first.co2e, quantity * factor_before);
    }
}
