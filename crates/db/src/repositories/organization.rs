//! Organization registry repository.
//!
//! Organizations register in a pending state and are moderated by an
//! admin before their users can write to the ledger.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use carbontrace_core::access::{require, Action, Role};
use carbontrace_core::cache::ViewCache;
use carbontrace_shared::AppError;

use crate::entities::{organizations, sea_orm_active_enums::OrgStatus};

/// Error types for organization registry operations.
#[derive(Debug, thiserror::Error)]
pub enum OrganizationError {
    /// Organization code already registered.
    #[error("Organization code '{0}' is already taken")]
    DuplicateCode(String),

    /// Organization code is empty or malformed.
    #[error("Organization code '{0}' is invalid")]
    InvalidCode(String),

    /// Organization not found.
    #[error("Organization not found: {0}")]
    NotFound(Uuid),

    /// Caller lacks the required role.
    #[error(transparent)]
    Access(#[from] carbontrace_core::access::AccessError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<OrganizationError> for AppError {
    fn from(err: OrganizationError) -> Self {
        let msg = err.to_string();
        match err {
            OrganizationError::DuplicateCode(_) => Self::Conflict(msg),
            OrganizationError::InvalidCode(_) => Self::Validation(msg),
            OrganizationError::NotFound(_) => Self::NotFound(msg),
            OrganizationError::Access(_) => Self::PermissionDenied(msg),
            OrganizationError::Database(_) => Self::Database(msg),
        }
    }
}

/// Organization registry for registration and moderation.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    db: DatabaseConnection,
    cache: ViewCache,
}

impl OrganizationRepository {
    /// Creates a new organization repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, cache: ViewCache) -> Self {
        Self { db, cache }
    }

    /// Registers a new organization in the pending state.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is malformed or already taken, or
    /// if the database insert fails.
    pub async fn register(
        &self,
        name: &str,
        code: &str,
        industry: Option<&str>,
    ) -> Result<organizations::Model, OrganizationError> {
        let code = normalize_org_code(code).ok_or_else(|| {
            OrganizationError::InvalidCode(code.to_string())
        })?;

        if self.code_exists(&code).await? {
            return Err(OrganizationError::DuplicateCode(code));
        }

        let now = chrono::Utc::now().into();
        let org = organizations::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.trim().to_string()),
            code: Set(code),
            industry: Set(industry.map(str::to_string)),
            status: Set(OrgStatus::Pending),
            baseline_year: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(org.insert(&self.db).await?)
    }

    /// Finds an organization by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<organizations::Model>, OrganizationError> {
        Ok(organizations::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Finds an organization by its unique code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<organizations::Model>, OrganizationError> {
        Ok(organizations::Entity::find()
            .filter(organizations::Column::Code.eq(code))
            .one(&self.db)
            .await?)
    }

    /// Checks whether an organization code is already taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn code_exists(&self, code: &str) -> Result<bool, OrganizationError> {
        let count = organizations::Entity::find()
            .filter(organizations::Column::Code.eq(code))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Lists organizations filtered by status, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_status(
        &self,
        status: OrgStatus,
    ) -> Result<Vec<organizations::Model>, OrganizationError> {
        Ok(organizations::Entity::find()
            .filter(organizations::Column::Status.eq(status))
            .order_by_desc(organizations::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Moderates a pending organization, setting its status.
    ///
    /// Admin only. Re-moderating is permitted so a rejection can be
    /// reversed after a successful appeal.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin, the
    /// organization does not exist, or the update fails.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: OrgStatus,
        actor_role: Role,
    ) -> Result<organizations::Model, OrganizationError> {
        require(actor_role, Action::ManageOrganizations)?;

        let org = self
            .find_by_id(id)
            .await?
            .ok_or(OrganizationError::NotFound(id))?;

        let mut active: organizations::ActiveModel = org.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Sets the organization's default baseline year for reduction
    /// goals. Manager or admin.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller lacks the role, the organization
    /// does not exist, or the update fails.
    pub async fn set_baseline_year(
        &self,
        id: Uuid,
        baseline_year: Option<i32>,
        actor_role: Role,
    ) -> Result<organizations::Model, OrganizationError> {
        require(actor_role, Action::ManageGoals)?;

        let org = self
            .find_by_id(id)
            .await?
            .ok_or(OrganizationError::NotFound(id))?;

        let mut active: organizations::ActiveModel = org.into();
        active.baseline_year = Set(baseline_year);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Removes an organization and everything that hangs off it. The
    /// foreign keys cascade to users, entries, custom sources, and
    /// goals, so the whole cache is dropped afterwards.
    ///
    /// Admin only. This is the one hard delete in the registry;
    /// moderation uses [`Self::set_status`] instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin, the
    /// organization does not exist, or the delete fails.
    pub async fn remove(&self, id: Uuid, actor_role: Role) -> Result<(), OrganizationError> {
        require(actor_role, Action::ManageOrganizations)?;

        let result = organizations::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(OrganizationError::NotFound(id));
        }

        tracing::info!(organization_id = %id, "organization removed");
        self.cache.invalidate_all();

        Ok(())
    }

    /// Checks whether an organization exists and is verified.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizationError::NotFound`] if the organization
    /// does not exist, or a database error.
    pub async fn is_verified(&self, id: Uuid) -> Result<bool, OrganizationError> {
        let org = self
            .find_by_id(id)
            .await?
            .ok_or(OrganizationError::NotFound(id))?;

        Ok(org.status == OrgStatus::Verified)
    }
}

/// Normalizes an organization code: trimmed, uppercased, alphanumeric
/// with hyphens, 2 to 16 characters. Returns `None` when malformed.
#[must_use]
pub fn normalize_org_code(code: &str) -> Option<String> {
    let code = code.trim().to_uppercase();
    let valid_len = (2..=16).contains(&code.len());
    let valid_chars = code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

    (valid_len && valid_chars).then_some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_org_code() {
        assert_eq!(normalize_org_code("acme"), Some("ACME".to_string()));
        assert_eq!(normalize_org_code("  gc-01 "), Some("GC-01".to_string()));
        assert_eq!(normalize_org_code("a"), None);
        assert_eq!(normalize_org_code(""), None);
        assert_eq!(normalize_org_code("has space"), None);
        assert_eq!(normalize_org_code("way-too-long-organization"), None);
    }
}
