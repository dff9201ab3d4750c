//! Catalog error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during factor catalog operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Emission factors must be strictly positive.
    #[error("Emission factor must be positive")]
    NonPositiveFactor,

    /// Every factor change must carry a justification.
    #[error("A change reason is required when updating an emission factor")]
    ReasonRequired,

    /// Source code already used within the organization.
    #[error("Source code '{0}' already exists in this organization")]
    DuplicateCode(String),

    /// Emission source not found.
    #[error("Emission source not found: {0}")]
    SourceNotFound(Uuid),

    /// Source is referenced by existing entries and cannot be deleted.
    #[error("Source {source_id} is used by {entry_count} emission entr(y/ies)")]
    SourceInUse {
        /// The source that was targeted.
        source_id: Uuid,
        /// Number of entries referencing it.
        entry_count: u64,
    },

    /// System-wide sources can be deactivated but never deleted.
    #[error("System sources cannot be deleted")]
    SystemSourceImmutable,
}

impl CatalogError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveFactor => "NON_POSITIVE_FACTOR",
            Self::ReasonRequired => "REASON_REQUIRED",
            Self::DuplicateCode(_) => "DUPLICATE_SOURCE_CODE",
            Self::SourceNotFound(_) => "SOURCE_NOT_FOUND",
            Self::SourceInUse { .. } => "SOURCE_IN_USE",
            Self::SystemSourceImmutable => "SYSTEM_SOURCE_IMMUTABLE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NonPositiveFactor | Self::ReasonRequired => 400,
            Self::DuplicateCode(_) | Self::SourceInUse { .. } => 409,
            Self::SourceNotFound(_) => 404,
            Self::SystemSourceImmutable => 422,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CatalogError::NonPositiveFactor.error_code(),
            "NON_POSITIVE_FACTOR"
        );
        assert_eq!(CatalogError::ReasonRequired.error_code(), "REASON_REQUIRED");
        assert_eq!(
            CatalogError::SourceNotFound(Uuid::nil()).error_code(),
            "SOURCE_NOT_FOUND"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(CatalogError::NonPositiveFactor.http_status_code(), 400);
        assert_eq!(
            CatalogError::DuplicateCode("X".into()).http_status_code(),
            409
        );
        assert_eq!(
            CatalogError::SourceNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(CatalogError::SystemSourceImmutable.http_status_code(), 422);
    }
}
