//! Pure validation rules for catalog mutations.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::CatalogError;
use super::types::SourceKind;

/// Validates a factor change request.
///
/// A successful `set_factor` must update the stored value, append
/// exactly one history record, and invalidate catalog views as a
/// single logical transaction; this function gates the input side.
///
/// # Errors
///
/// * [`CatalogError::NonPositiveFactor`] if `new_value <= 0`
/// * [`CatalogError::ReasonRequired`] if `reason` is blank
pub fn validate_factor_change(new_value: Decimal, reason: &str) -> Result<(), CatalogError> {
    if new_value <= Decimal::ZERO {
        return Err(CatalogError::NonPositiveFactor);
    }
    if reason.trim().is_empty() {
        return Err(CatalogError::ReasonRequired);
    }
    Ok(())
}

/// Validates that a source may be deleted.
///
/// Only unused custom sources are deletable; deactivation is the path
/// for everything else. Deleting a source cascades its history rows,
/// which is acceptable precisely because no entry references it.
///
/// # Errors
///
/// * [`CatalogError::SystemSourceImmutable`] for system sources
/// * [`CatalogError::SourceInUse`] if any entry references the source
pub fn validate_source_deletion(
    source_id: Uuid,
    kind: SourceKind,
    entry_count: u64,
) -> Result<(), CatalogError> {
    if kind == SourceKind::System {
        return Err(CatalogError::SystemSourceImmutable);
    }
    if entry_count > 0 {
        return Err(CatalogError::SourceInUse {
            source_id,
            entry_count,
        });
    }
    Ok(())
}

/// Generates the code for a new custom source.
///
/// Codes are sequential per organization: `CUSTOM-{org}-{nnn}`. The
/// suffix is one past the highest suffix among the organization's
/// surviving codes, so deleting an old source never re-issues a code
/// that is still in use.
#[must_use]
pub fn custom_source_code(organization_code: &str, existing_codes: &[String]) -> String {
    let next = existing_codes
        .iter()
        .filter_map(|code| custom_code_suffix(code))
        .max()
        .unwrap_or(0)
        + 1;

    format!("CUSTOM-{organization_code}-{next:03}")
}

/// Numeric suffix of a `CUSTOM-{org}-{nnn}` code, if it has one.
fn custom_code_suffix(code: &str) -> Option<u64> {
    code.rsplit_once('-')?.1.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_factor_change_positive_with_reason() {
        assert_eq!(
            validate_factor_change(dec!(0.4085), "DEFRA 2025 update"),
            Ok(())
        );
    }

    #[test]
    fn test_factor_change_rejects_non_positive() {
        assert_eq!(
            validate_factor_change(Decimal::ZERO, "reason"),
            Err(CatalogError::NonPositiveFactor)
        );
        assert_eq!(
            validate_factor_change(dec!(-1.5), "reason"),
            Err(CatalogError::NonPositiveFactor)
        );
    }

    #[test]
    fn test_factor_change_rejects_blank_reason() {
        assert_eq!(
            validate_factor_change(dec!(1), ""),
            Err(CatalogError::ReasonRequired)
        );
        assert_eq!(
            validate_factor_change(dec!(1), "   "),
            Err(CatalogError::ReasonRequired)
        );
    }

    #[test]
    fn test_deletion_guards() {
        let id = Uuid::new_v4();
        assert_eq!(
            validate_source_deletion(id, SourceKind::System, 0),
            Err(CatalogError::SystemSourceImmutable)
        );
        assert_eq!(
            validate_source_deletion(id, SourceKind::Custom, 3),
            Err(CatalogError::SourceInUse {
                source_id: id,
                entry_count: 3
            })
        );
        assert_eq!(validate_source_deletion(id, SourceKind::Custom, 0), Ok(()));
    }

    #[test]
    fn test_custom_source_code_format() {
        assert_eq!(custom_source_code("ACME", &[]), "CUSTOM-ACME-001");

        let codes: Vec<String> = (1..=11)
            .map(|n| format!("CUSTOM-ACME-{n:03}"))
            .collect();
        assert_eq!(custom_source_code("ACME", &codes), "CUSTOM-ACME-012");

        let big = vec!["CUSTOM-ACME-999".to_string()];
        assert_eq!(custom_source_code("ACME", &big), "CUSTOM-ACME-1000");
    }

    #[test]
    fn test_custom_source_code_survives_deletion_gaps() {
        // 001 was created and deleted; 002 survives. The generator
        // must not re-issue 002.
        let codes = vec!["CUSTOM-ACME-002".to_string()];
        assert_eq!(custom_source_code("ACME", &codes), "CUSTOM-ACME-003");

        // Malformed codes are ignored rather than poisoning the max.
        let mixed = vec![
            "CUSTOM-ACME-003".to_string(),
            "LEGACY-CODE".to_string(),
        ];
        assert_eq!(custom_source_code("ACME", &mixed), "CUSTOM-ACME-004");
    }

    proptest! {
        /// A factor change is accepted exactly when the value is positive
        /// and the reason is non-blank.
        #[test]
        fn prop_factor_change_acceptance(
            units in -10_000i64..10_000i64,
            scale in 0u32..10u32,
            reason in "[ a-zA-Z0-9]{0,24}",
        ) {
            let value = Decimal::new(units, scale);
            let result = validate_factor_change(value, &reason);
            let should_pass = value > Decimal::ZERO && !reason.trim().is_empty();
            prop_assert_eq!(result.is_ok(), should_pass);
        }
    }
}
