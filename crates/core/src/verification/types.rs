//! Verification domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Verification status of an emission entry.
///
/// The valid transitions are:
/// - Unverified -> Verified (decide)
/// - Unverified -> Rejected (decide, with note)
///
/// Verified and Rejected are terminal; corrections are re-submitted
/// as new entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Awaiting a manager decision.
    Unverified,
    /// Accepted; counts toward aggregates and baselines.
    Verified,
    /// Rejected with a note; kept for audit, excluded from aggregates.
    Rejected,
}

impl VerificationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unverified => "unverified",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unverified" => Some(Self::Unverified),
            "verified" => Some(Self::Verified),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Verified | Self::Rejected)
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The outcome a decider requests for an unverified entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionOutcome {
    /// Accept the entry.
    Verified,
    /// Reject the entry (requires a note).
    Rejected,
}

impl DecisionOutcome {
    /// The status this outcome transitions the entry to.
    #[must_use]
    pub const fn target_status(self) -> VerificationStatus {
        match self {
            Self::Verified => VerificationStatus::Verified,
            Self::Rejected => VerificationStatus::Rejected,
        }
    }
}

/// A validated decision with its audit data, ready to be applied.
///
/// The terminal fields (status, verifier, timestamp, note) are set
/// exactly once per entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// The status the entry transitions to.
    pub new_status: VerificationStatus,
    /// The manager or admin who decided.
    pub decided_by: Uuid,
    /// When the decision was made.
    pub decided_at: DateTime<Utc>,
    /// Required iff the entry was rejected.
    pub rejection_note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_roundtrip() {
        for status in [
            VerificationStatus::Unverified,
            VerificationStatus::Verified,
            VerificationStatus::Rejected,
        ] {
            assert_eq!(VerificationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(VerificationStatus::parse("VERIFIED"), Some(VerificationStatus::Verified));
        assert_eq!(VerificationStatus::parse("pending"), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!VerificationStatus::Unverified.is_terminal());
        assert!(VerificationStatus::Verified.is_terminal());
        assert!(VerificationStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_outcome_targets() {
        assert_eq!(
            DecisionOutcome::Verified.target_status(),
            VerificationStatus::Verified
        );
        assert_eq!(
            DecisionOutcome::Rejected.target_status(),
            VerificationStatus::Rejected
        );
    }
}
