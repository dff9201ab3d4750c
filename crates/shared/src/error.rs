//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Domain modules carry their own structured error enums; this type is
/// the boundary taxonomy a presentation layer maps to user-facing
/// messages. The core never coerces an error into a default value.
#[derive(Debug, Error)]
pub enum AppError {
    /// Access denied: the caller's role does not allow the action.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Referenced entity absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or out-of-range input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation attempted against the current lifecycle state.
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Goal creation attempted with no verified baseline-year data.
    #[error("Insufficient baseline data: {0}")]
    InsufficientBaselineData(String),

    /// Lost an atomic decide race or other concurrent write conflict.
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// Conflict (e.g., duplicate code).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::PermissionDenied(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) | Self::InsufficientBaselineData(_) => 400,
            Self::InvalidStateTransition(_) => 422,
            Self::ConcurrencyConflict(_) | Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidStateTransition(_) => "INVALID_STATE_TRANSITION",
            Self::InsufficientBaselineData(_) => "INSUFFICIENT_BASELINE_DATA",
            Self::ConcurrencyConflict(_) => "CONCURRENCY_CONFLICT",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the caller may safely retry the operation.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict(_))
    }
}
