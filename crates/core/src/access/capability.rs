//! The capability table mapping `(role, action)` to allowed/denied.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AccessError, Role};

/// An action a caller may attempt against the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Record a new activity entry.
    AddEntry,
    /// Delete an unverified entry.
    DeleteEntry,
    /// Verify or reject an unverified entry.
    VerifyEntry,
    /// Change an emission factor or manage custom sources.
    ManageFactors,
    /// Create goals, initiatives, and progress records.
    ManageGoals,
    /// Verify, reject, or remove organizations.
    ManageOrganizations,
    /// Create users and assign roles.
    ManageUsers,
}

impl Action {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddEntry => "add_entry",
            Self::DeleteEntry => "delete_entry",
            Self::VerifyEntry => "verify_entry",
            Self::ManageFactors => "manage_factors",
            Self::ManageGoals => "manage_goals",
            Self::ManageOrganizations => "manage_organizations",
            Self::ManageUsers => "manage_users",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returns the minimum role allowed to perform an action.
const fn required_role(action: Action) -> Role {
    match action {
        Action::AddEntry => Role::NormalUser,
        Action::DeleteEntry
        | Action::VerifyEntry
        | Action::ManageFactors
        | Action::ManageGoals => Role::Manager,
        Action::ManageOrganizations | Action::ManageUsers => Role::Admin,
    }
}

/// Checks whether a role may perform an action.
#[must_use]
pub fn can(role: Role, action: Action) -> bool {
    role >= required_role(action)
}

/// Checks a capability, returning a structured error on denial.
///
/// # Errors
///
/// Returns [`AccessError::InsufficientRole`] if the role is too low.
pub fn require(role: Role, action: Action) -> Result<(), AccessError> {
    if can(role, action) {
        Ok(())
    } else {
        Err(AccessError::InsufficientRole { role, action })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Role::NormalUser, Action::AddEntry, true)]
    #[case(Role::NormalUser, Action::VerifyEntry, false)]
    #[case(Role::NormalUser, Action::DeleteEntry, false)]
    #[case(Role::NormalUser, Action::ManageFactors, false)]
    #[case(Role::NormalUser, Action::ManageGoals, false)]
    #[case(Role::NormalUser, Action::ManageUsers, false)]
    #[case(Role::Manager, Action::AddEntry, true)]
    #[case(Role::Manager, Action::VerifyEntry, true)]
    #[case(Role::Manager, Action::DeleteEntry, true)]
    #[case(Role::Manager, Action::ManageFactors, true)]
    #[case(Role::Manager, Action::ManageGoals, true)]
    #[case(Role::Manager, Action::ManageOrganizations, false)]
    #[case(Role::Manager, Action::ManageUsers, false)]
    #[case(Role::Admin, Action::VerifyEntry, true)]
    #[case(Role::Admin, Action::ManageOrganizations, true)]
    #[case(Role::Admin, Action::ManageUsers, true)]
    fn test_capability_table(#[case] role: Role, #[case] action: Action, #[case] allowed: bool) {
        assert_eq!(can(role, action), allowed);
    }

    #[test]
    fn test_require_denied_carries_context() {
        let err = require(Role::NormalUser, Action::VerifyEntry).unwrap_err();
        assert_eq!(
            err,
            AccessError::InsufficientRole {
                role: Role::NormalUser,
                action: Action::VerifyEntry,
            }
        );
        assert_eq!(
            err.to_string(),
            "Role 'normal_user' is not allowed to perform 'verify_entry'"
        );
    }

    #[test]
    fn test_admin_can_do_everything() {
        for action in [
            Action::AddEntry,
            Action::DeleteEntry,
            Action::VerifyEntry,
            Action::ManageFactors,
            Action::ManageGoals,
            Action::ManageOrganizations,
            Action::ManageUsers,
        ] {
            assert!(can(Role::Admin, action), "admin denied {action}");
        }
    }
}
