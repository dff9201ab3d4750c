//! Ledger error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when recording or reading emission entries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Activity quantity must be strictly positive.
    #[error("Activity quantity must be positive")]
    NonPositiveQuantity,

    /// Reporting period token must not be empty.
    #[error("Reporting period is required")]
    EmptyPeriod,

    /// Reporting period must start with a year in the accepted range.
    #[error("Reporting period '{period}' is outside the accepted year range [1900, 2100]")]
    PeriodOutOfRange {
        /// The offending period token.
        period: String,
    },

    /// Entries may not reference deactivated sources going forward.
    #[error("Emission source {0} is inactive")]
    SourceInactive(Uuid),

    /// Emission source not found.
    #[error("Emission source not found: {0}")]
    SourceNotFound(Uuid),

    /// Custom sources are only usable by their owning organization.
    #[error("Emission source {source_id} does not belong to organization {organization_id}")]
    SourceOrganizationMismatch {
        /// The referenced source.
        source_id: Uuid,
        /// The recording organization.
        organization_id: Uuid,
    },

    /// Recording organization not found.
    #[error("Organization not found: {0}")]
    OrganizationNotFound(Uuid),

    /// Only verified organizations may record entries.
    #[error("Organization {0} is not verified")]
    OrganizationNotVerified(Uuid),

    /// Emission entry not found.
    #[error("Emission entry not found: {0}")]
    EntryNotFound(Uuid),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveQuantity => "NON_POSITIVE_QUANTITY",
            Self::EmptyPeriod => "EMPTY_PERIOD",
            Self::PeriodOutOfRange { .. } => "PERIOD_OUT_OF_RANGE",
            Self::SourceInactive(_) => "SOURCE_INACTIVE",
            Self::SourceNotFound(_) => "SOURCE_NOT_FOUND",
            Self::SourceOrganizationMismatch { .. } => "SOURCE_ORGANIZATION_MISMATCH",
            Self::OrganizationNotFound(_) => "ORGANIZATION_NOT_FOUND",
            Self::OrganizationNotVerified(_) => "ORGANIZATION_NOT_VERIFIED",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NonPositiveQuantity
            | Self::EmptyPeriod
            | Self::PeriodOutOfRange { .. }
            | Self::SourceInactive(_)
            | Self::SourceOrganizationMismatch { .. }
            | Self::OrganizationNotVerified(_) => 400,
            Self::OrganizationNotFound(_) | Self::SourceNotFound(_) | Self::EntryNotFound(_) => {
                404
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::NonPositiveQuantity.error_code(),
            "NON_POSITIVE_QUANTITY"
        );
        assert_eq!(
            LedgerError::SourceInactive(Uuid::nil()).error_code(),
            "SOURCE_INACTIVE"
        );
        assert_eq!(
            LedgerError::PeriodOutOfRange {
                period: "1776".into()
            }
            .error_code(),
            "PERIOD_OUT_OF_RANGE"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::NonPositiveQuantity.http_status_code(), 400);
        assert_eq!(
            LedgerError::SourceNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::EntryNotFound(Uuid::nil()).http_status_code(),
            404
        );
        // Absence is 404; an existing but unverified org is 400.
        assert_eq!(
            LedgerError::OrganizationNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::OrganizationNotVerified(Uuid::nil()).http_status_code(),
            400
        );
    }
}
