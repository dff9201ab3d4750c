//! Role capability checks.
//!
//! Every mutating operation in the repositories starts by calling
//! [`require`] with the caller's role. Roles are supplied by the
//! identity collaborator and are never inferred from a presentation
//! layer.

mod capability;
mod role;

pub use capability::{can, require, Action};
pub use role::Role;

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by capability checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    /// The caller's role does not allow the action.
    #[error("Role '{role}' is not allowed to perform '{action}'")]
    InsufficientRole {
        /// The caller's role.
        role: Role,
        /// The attempted action.
        action: Action,
    },

    /// The caller acts outside their own organization.
    #[error("User {user_id} does not belong to organization {organization_id}")]
    OrganizationMismatch {
        /// The acting user.
        user_id: Uuid,
        /// The organization owning the data.
        organization_id: Uuid,
    },
}
