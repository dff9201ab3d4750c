//! Reduction tracker error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur in goal and initiative tracking.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReductionError {
    /// Target year must come after the baseline year.
    #[error("Target year {target_year} must be after baseline year {baseline_year}")]
    InvalidYearRange {
        /// The goal's baseline year.
        baseline_year: i32,
        /// The goal's target year.
        target_year: i32,
    },

    /// Target reduction percentage must be in (0, 100].
    #[error("Target reduction percentage {0} must be between 0 and 100")]
    InvalidTargetPercentage(Decimal),

    /// A goal cannot be anchored to an empty baseline.
    #[error("No verified emission entries exist for baseline year {baseline_year}")]
    InsufficientBaselineData {
        /// The requested baseline year.
        baseline_year: i32,
    },

    /// Progress percentages must lie in [0, 100].
    #[error("Progress percentage {0} must be between 0 and 100")]
    InvalidProgressPercentage(Decimal),

    /// Reduction goal not found.
    #[error("Reduction goal not found: {0}")]
    GoalNotFound(Uuid),

    /// Initiative not found.
    #[error("Initiative not found: {0}")]
    InitiativeNotFound(Uuid),
}

impl ReductionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidYearRange { .. } => "INVALID_YEAR_RANGE",
            Self::InvalidTargetPercentage(_) => "INVALID_TARGET_PERCENTAGE",
            Self::InsufficientBaselineData { .. } => "INSUFFICIENT_BASELINE_DATA",
            Self::InvalidProgressPercentage(_) => "INVALID_PROGRESS_PERCENTAGE",
            Self::GoalNotFound(_) => "GOAL_NOT_FOUND",
            Self::InitiativeNotFound(_) => "INITIATIVE_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidYearRange { .. }
            | Self::InvalidTargetPercentage(_)
            | Self::InsufficientBaselineData { .. }
            | Self::InvalidProgressPercentage(_) => 400,
            Self::GoalNotFound(_) | Self::InitiativeNotFound(_) => 404,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ReductionError::InsufficientBaselineData { baseline_year: 2020 }.error_code(),
            "INSUFFICIENT_BASELINE_DATA"
        );
        assert_eq!(
            ReductionError::InvalidTargetPercentage(dec!(120)).error_code(),
            "INVALID_TARGET_PERCENTAGE"
        );
        assert_eq!(
            ReductionError::GoalNotFound(Uuid::nil()).http_status_code(),
            404
        );
    }
}
