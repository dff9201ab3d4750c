//! Reduction tracker domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a reduction goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// The organization's current goal.
    Active,
    /// Work underway against the goal.
    InProgress,
    /// Target met.
    Achieved,
    /// Dropped without being met.
    Abandoned,
}

impl GoalStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::InProgress => "in_progress",
            Self::Achieved => "achieved",
            Self::Abandoned => "abandoned",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "in_progress" => Some(Self::InProgress),
            "achieved" => Some(Self::Achieved),
            "abandoned" => Some(Self::Abandoned),
            _ => None,
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a reduction initiative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitiativeStatus {
    /// Scoped but not started.
    Planned,
    /// Underway.
    InProgress,
    /// Finished, actuals recorded.
    Completed,
    /// Dropped.
    Cancelled,
}

impl InitiativeStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "planned" => Some(Self::Planned),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for InitiativeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The numbers a goal's progress math needs.
///
/// `baseline_emissions_total` is frozen at goal creation and is
/// guaranteed nonzero by the creation precondition (at least one
/// verified entry, each with positive co2e).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalSummary {
    /// Reference year the baseline was computed over.
    pub baseline_year: i32,
    /// Frozen sum of verified co2e for the baseline year.
    pub baseline_emissions_total: Decimal,
    /// Year the target must be met by.
    pub target_year: i32,
    /// Percent reduction targeted against the baseline, in (0, 100].
    pub target_reduction_percentage: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_status_roundtrip() {
        for status in [
            GoalStatus::Active,
            GoalStatus::InProgress,
            GoalStatus::Achieved,
            GoalStatus::Abandoned,
        ] {
            assert_eq!(GoalStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(GoalStatus::parse("inactive"), None);
    }

    #[test]
    fn test_initiative_status_roundtrip() {
        for status in [
            InitiativeStatus::Planned,
            InitiativeStatus::InProgress,
            InitiativeStatus::Completed,
            InitiativeStatus::Cancelled,
        ] {
            assert_eq!(InitiativeStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(InitiativeStatus::parse("done"), None);
    }
}
