//! Verification error types.

use thiserror::Error;
use uuid::Uuid;

use crate::access::Role;

use super::types::VerificationStatus;

/// Errors that can occur while deciding an entry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerificationError {
    /// The entry is not in a state the requested transition accepts.
    /// Re-deciding a decided entry fails here, it is never silently
    /// accepted.
    #[error("Invalid transition from '{from}' to '{to}'")]
    InvalidTransition {
        /// Current status of the entry.
        from: VerificationStatus,
        /// Requested target status.
        to: VerificationStatus,
    },

    /// A rejection must carry a non-empty note.
    #[error("A note is required when rejecting an entry")]
    NoteRequired,

    /// Only managers and admins may decide entries.
    #[error("Role '{0}' may not verify entries")]
    InsufficientRole(Role),

    /// Emission entry not found.
    #[error("Emission entry not found: {0}")]
    EntryNotFound(Uuid),

    /// Lost the atomic status compare-and-set race.
    #[error("Entry {0} was decided concurrently")]
    ConcurrencyConflict(Uuid),
}

impl VerificationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_STATE_TRANSITION",
            Self::NoteRequired => "NOTE_REQUIRED",
            Self::InsufficientRole(_) => "PERMISSION_DENIED",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::ConcurrencyConflict(_) => "CONCURRENCY_CONFLICT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. } => 422,
            Self::NoteRequired => 400,
            Self::InsufficientRole(_) => 403,
            Self::EntryNotFound(_) => 404,
            Self::ConcurrencyConflict(_) => 409,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_statuses() {
        let err = VerificationError::InvalidTransition {
            from: VerificationStatus::Verified,
            to: VerificationStatus::Rejected,
        };
        assert_eq!(err.error_code(), "INVALID_STATE_TRANSITION");
        assert_eq!(err.http_status_code(), 422);

        assert_eq!(VerificationError::NoteRequired.http_status_code(), 400);
        assert_eq!(
            VerificationError::InsufficientRole(Role::NormalUser).http_status_code(),
            403
        );
        assert_eq!(
            VerificationError::ConcurrencyConflict(Uuid::nil()).error_code(),
            "CONCURRENCY_CONFLICT"
        );
    }
}
