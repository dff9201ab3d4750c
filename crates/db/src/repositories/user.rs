//! User registry repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use carbontrace_core::access::{require, Action, Role};
use carbontrace_shared::AppError;

use crate::entities::{sea_orm_active_enums::UserRole, users};

/// Error types for user registry operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Email already registered.
    #[error("Email '{0}' is already registered")]
    DuplicateEmail(String),

    /// Email is malformed.
    #[error("Email '{0}' is invalid")]
    InvalidEmail(String),

    /// Only admins may be created without an organization.
    #[error("Role '{0}' requires an organization")]
    OrganizationRequired(String),

    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Caller lacks the required role.
    #[error(transparent)]
    Access(#[from] carbontrace_core::access::AccessError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        let msg = err.to_string();
        match err {
            UserError::DuplicateEmail(_) => Self::Conflict(msg),
            UserError::InvalidEmail(_) | UserError::OrganizationRequired(_) => {
                Self::Validation(msg)
            }
            UserError::NotFound(_) => Self::NotFound(msg),
            UserError::Access(_) => Self::PermissionDenied(msg),
            UserError::Database(_) => Self::Database(msg),
        }
    }
}

/// Maps a stored role to the domain role used for access checks.
#[must_use]
pub const fn role_to_core(role: &UserRole) -> Role {
    match role {
        UserRole::Admin => Role::Admin,
        UserRole::Manager => Role::Manager,
        UserRole::NormalUser => Role::NormalUser,
    }
}

/// User registry scoped to organizations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a user. Admin only.
    ///
    /// The role is fixed at creation. Admins may be created without an
    /// organization; managers and normal users must belong to one.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin, the email is
    /// malformed or taken, a non-admin has no organization, or the
    /// insert fails.
    pub async fn create(
        &self,
        organization_id: Option<Uuid>,
        email: &str,
        display_name: &str,
        role: UserRole,
        actor_role: Role,
    ) -> Result<users::Model, UserError> {
        require(actor_role, Action::ManageUsers)?;

        if organization_id.is_none() && role != UserRole::Admin {
            return Err(UserError::OrganizationRequired(format!("{role:?}")));
        }

        let email = email.trim().to_lowercase();
        if !is_plausible_email(&email) {
            return Err(UserError::InvalidEmail(email));
        }
        if self.find_by_email(&email).await?.is_some() {
            return Err(UserError::DuplicateEmail(email));
        }

        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            email: Set(email),
            display_name: Set(display_name.trim().to_string()),
            role: Set(role),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(user.insert(&self.db).await?)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, UserError> {
        Ok(users::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, UserError> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    /// Lists users of an organization, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<users::Model>, UserError> {
        Ok(users::Entity::find()
            .filter(users::Column::OrganizationId.eq(organization_id))
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Activates or deactivates a user. Admin only.
    ///
    /// Deactivated users keep their historical entries; the flag only
    /// gates future writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin, the user does
    /// not exist, or the update fails.
    pub async fn set_active(
        &self,
        id: Uuid,
        is_active: bool,
        actor_role: Role,
    ) -> Result<users::Model, UserError> {
        require(actor_role, Action::ManageUsers)?;

        let user = self.find_by_id(id).await?.ok_or(UserError::NotFound(id))?;

        let mut active: users::ActiveModel = user.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Counts users in an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_by_organization(&self, organization_id: Uuid) -> Result<u64, UserError> {
        Ok(users::Entity::find()
            .filter(users::Column::OrganizationId.eq(organization_id))
            .count(&self.db)
            .await?)
    }
}

/// Minimal shape check for email addresses. Full validation is the
/// mail system's job; this only rejects obvious garbage.
#[must_use]
pub fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
