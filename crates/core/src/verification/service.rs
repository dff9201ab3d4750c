//! Decision logic for the verification state machine.

use chrono::Utc;
use uuid::Uuid;

use crate::access::{self, Action, Role};

use super::error::VerificationError;
use super::types::{Decision, DecisionOutcome, VerificationStatus};

/// Stateless service validating verification decisions.
///
/// Pure logic over the entry's current status; the repository applies
/// the returned [`Decision`] with a compare-and-set write so two
/// concurrent deciders cannot both succeed.
pub struct VerificationService;

impl VerificationService {
    /// Validates a decision against the current entry status.
    ///
    /// Preconditions:
    /// - decider's role allows `verify_entry` (manager or admin)
    /// - entry is currently `unverified`
    /// - a rejection carries a non-empty note
    ///
    /// # Errors
    ///
    /// * [`VerificationError::InsufficientRole`] if the role is too low
    /// * [`VerificationError::InvalidTransition`] if already decided
    /// * [`VerificationError::NoteRequired`] for a note-less rejection
    pub fn decide(
        current_status: VerificationStatus,
        decider_id: Uuid,
        decider_role: Role,
        outcome: DecisionOutcome,
        note: Option<String>,
    ) -> Result<Decision, VerificationError> {
        if access::require(decider_role, Action::VerifyEntry).is_err() {
            return Err(VerificationError::InsufficientRole(decider_role));
        }

        let target = outcome.target_status();
        if !Self::is_valid_transition(current_status, target) {
            return Err(VerificationError::InvalidTransition {
                from: current_status,
                to: target,
            });
        }

        let rejection_note = match outcome {
            DecisionOutcome::Rejected => {
                let note = note.map(|n| n.trim().to_string()).unwrap_or_default();
                if note.is_empty() {
                    return Err(VerificationError::NoteRequired);
                }
                Some(note)
            }
            // A note on verification is allowed but not stored; only
            // rejections carry one.
            DecisionOutcome::Verified => None,
        };

        Ok(Decision {
            new_status: target,
            decided_by: decider_id,
            decided_at: Utc::now(),
            rejection_note,
        })
    }

    /// Check if a status transition is valid.
    ///
    /// The full transition table: only `unverified` has outgoing edges,
    /// to `verified` and `rejected`.
    #[must_use]
    pub fn is_valid_transition(from: VerificationStatus, to: VerificationStatus) -> bool {
        matches!(
            (from, to),
            (
                VerificationStatus::Unverified,
                VerificationStatus::Verified | VerificationStatus::Rejected
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_verify_from_unverified() {
        let decider = Uuid::new_v4();
        let decision = VerificationService::decide(
            VerificationStatus::Unverified,
            decider,
            Role::Manager,
            DecisionOutcome::Verified,
            None,
        )
        .unwrap();
        assert_eq!(decision.new_status, VerificationStatus::Verified);
        assert_eq!(decision.decided_by, decider);
        assert_eq!(decision.rejection_note, None);
    }

    #[test]
    fn test_reject_requires_note() {
        let result = VerificationService::decide(
            VerificationStatus::Unverified,
            Uuid::new_v4(),
            Role::Manager,
            DecisionOutcome::Rejected,
            None,
        );
        assert_eq!(result, Err(VerificationError::NoteRequired));

        let result = VerificationService::decide(
            VerificationStatus::Unverified,
            Uuid::new_v4(),
            Role::Manager,
            DecisionOutcome::Rejected,
            Some("   ".to_string()),
        );
        assert_eq!(result, Err(VerificationError::NoteRequired));
    }

    #[test]
    fn test_reject_with_note() {
        let decision = VerificationService::decide(
            VerificationStatus::Unverified,
            Uuid::new_v4(),
            Role::Admin,
            DecisionOutcome::Rejected,
            Some("Meter reading implausible".to_string()),
        )
        .unwrap();
        assert_eq!(decision.new_status, VerificationStatus::Rejected);
        assert_eq!(
            decision.rejection_note.as_deref(),
            Some("Meter reading implausible")
        );
    }

    #[rstest]
    #[case(VerificationStatus::Verified, DecisionOutcome::Verified)]
    #[case(VerificationStatus::Verified, DecisionOutcome::Rejected)]
    #[case(VerificationStatus::Rejected, DecisionOutcome::Verified)]
    #[case(VerificationStatus::Rejected, DecisionOutcome::Rejected)]
    fn test_redeciding_decided_entry_fails(
        #[case] current: VerificationStatus,
        #[case] outcome: DecisionOutcome,
    ) {
        let result = VerificationService::decide(
            current,
            Uuid::new_v4(),
            Role::Manager,
            outcome,
            Some("note".to_string()),
        );
        assert_eq!(
            result,
            Err(VerificationError::InvalidTransition {
                from: current,
                to: outcome.target_status(),
            })
        );
    }

    #[test]
    fn test_normal_user_cannot_decide() {
        let result = VerificationService::decide(
            VerificationStatus::Unverified,
            Uuid::new_v4(),
            Role::NormalUser,
            DecisionOutcome::Verified,
            None,
        );
        assert_eq!(
            result,
            Err(VerificationError::InsufficientRole(Role::NormalUser))
        );
    }

    #[test]
    fn test_transition_table() {
        use VerificationStatus::{Rejected, Unverified, Verified};
        assert!(VerificationService::is_valid_transition(Unverified, Verified));
        assert!(VerificationService::is_valid_transition(Unverified, Rejected));
        assert!(!VerificationService::is_valid_transition(Verified, Rejected));
        assert!(!VerificationService::is_valid_transition(Verified, Unverified));
        assert!(!VerificationService::is_valid_transition(Rejected, Verified));
        assert!(!VerificationService::is_valid_transition(Rejected, Unverified));
        assert!(!VerificationService::is_valid_transition(Unverified, Unverified));
    }
}
