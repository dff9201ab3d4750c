//! Factor catalog repository.
//!
//! Serves the shared system catalog plus each organization's custom
//! sources, and guards the factor audit trail: every successful factor
//! update writes the new value and appends exactly one history row in
//! the same transaction.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use carbontrace_core::access::{require, Action, Role};
use carbontrace_core::cache::{CacheFamily, ViewCache};
use carbontrace_core::catalog::{
    custom_source_code, validate_factor_change, validate_source_deletion, CatalogError, Scope,
    SourceInfo,
};
use carbontrace_shared::AppError;

use crate::entities::{
    categories, emission_entries, emission_sources, factor_history,
    sea_orm_active_enums::SourceKind,
};

/// Families a catalog mutation must clear.
const CATALOG_FAMILIES: [CacheFamily; 3] = [
    CacheFamily::SourcesByCategory,
    CacheFamily::FactorById,
    CacheFamily::FactorHistory,
];

/// Error types for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogStoreError {
    /// Domain rule violated.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Caller lacks the required role or scope.
    #[error(transparent)]
    Access(#[from] carbontrace_core::access::AccessError),

    /// Referenced category does not exist.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CatalogStoreError> for AppError {
    fn from(err: CatalogStoreError) -> Self {
        let msg = err.to_string();
        match err {
            CatalogStoreError::Catalog(inner) => match inner {
                CatalogError::NonPositiveFactor | CatalogError::ReasonRequired => {
                    Self::Validation(msg)
                }
                CatalogError::DuplicateCode(_) => Self::Conflict(msg),
                CatalogError::SourceNotFound(_) => Self::NotFound(msg),
                CatalogError::SourceInUse { .. } | CatalogError::SystemSourceImmutable => {
                    Self::InvalidStateTransition(msg)
                }
            },
            CatalogStoreError::Access(_) => Self::PermissionDenied(msg),
            CatalogStoreError::CategoryNotFound(_) => Self::NotFound(msg),
            CatalogStoreError::Database(_) => Self::Database(msg),
        }
    }
}

/// Input for creating a custom emission source.
#[derive(Debug, Clone)]
pub struct CreateCustomSourceInput {
    /// Owning organization.
    pub organization_id: Uuid,
    /// Code of the owning organization, used in the generated source code.
    pub organization_code: String,
    /// Category the source belongs to.
    pub category_id: Uuid,
    /// Display name.
    pub name: String,
    /// Conversion factor in kg CO2e per unit.
    pub factor_value: Decimal,
    /// Activity unit.
    pub unit: String,
    /// Optional description.
    pub description: Option<String>,
    /// Region the factor applies to.
    pub region: Option<String>,
    /// Publication year of the factor.
    pub reference_year: Option<i32>,
}

/// Factor catalog repository with read-view caching.
#[derive(Clone)]
pub struct CatalogRepository {
    db: DatabaseConnection,
    cache: ViewCache,
}

impl CatalogRepository {
    /// Creates a new catalog repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, cache: ViewCache) -> Self {
        Self { db, cache }
    }

    /// Lists categories, optionally restricted to one scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_categories(
        &self,
        scope: Option<Scope>,
    ) -> Result<Vec<categories::Model>, CatalogStoreError> {
        let mut query = categories::Entity::find();
        if let Some(scope) = scope {
            query = query.filter(categories::Column::ScopeNumber.eq(i16::from(scope.number())));
        }

        Ok(query
            .order_by_asc(categories::Column::Code)
            .all(&self.db)
            .await?)
    }

    /// Lists sources visible to an organization: the system catalog
    /// plus the organization's own custom sources.
    ///
    /// Served through the cache; any catalog mutation clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_sources(
        &self,
        organization_id: Uuid,
        category_id: Option<Uuid>,
        include_inactive: bool,
    ) -> Result<Vec<emission_sources::Model>, CatalogStoreError> {
        let key = sources_cache_key(organization_id, category_id, include_inactive);
        if let Some(cached) = self.cache.get(CacheFamily::SourcesByCategory, &key) {
            return Ok(cached);
        }

        let mut query = emission_sources::Entity::find().filter(
            emission_sources::Column::OrganizationId
                .is_null()
                .or(emission_sources::Column::OrganizationId.eq(organization_id)),
        );
        if let Some(category_id) = category_id {
            query = query.filter(emission_sources::Column::CategoryId.eq(category_id));
        }
        if !include_inactive {
            query = query.filter(emission_sources::Column::IsActive.eq(true));
        }

        let sources = query
            .order_by_asc(emission_sources::Column::Code)
            .all(&self.db)
            .await?;

        self.cache
            .put(CacheFamily::SourcesByCategory, &key, &sources);
        Ok(sources)
    }

    /// Fetches a single source by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::SourceNotFound`] if absent, or a
    /// database error.
    pub async fn get_source(
        &self,
        source_id: Uuid,
    ) -> Result<emission_sources::Model, CatalogStoreError> {
        let key = source_id.to_string();
        if let Some(cached) = self.cache.get(CacheFamily::FactorById, &key) {
            return Ok(cached);
        }

        let source = emission_sources::Entity::find_by_id(source_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::SourceNotFound(source_id))?;

        self.cache.put(CacheFamily::FactorById, &key, &source);
        Ok(source)
    }

    /// Updates a source's conversion factor.
    ///
    /// Managers only. The new value and the audit row commit in one
    /// transaction, so the trail can never drift from the catalog.
    /// Already-recorded ledger entries are untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller lacks the role, the value is not
    /// positive, the reason is blank, the source does not exist, or
    /// the transaction fails.
    pub async fn set_factor(
        &self,
        source_id: Uuid,
        new_value: Decimal,
        reason: &str,
        changed_by: Uuid,
        actor_role: Role,
    ) -> Result<emission_sources::Model, CatalogStoreError> {
        require(actor_role, Action::ManageFactors)?;
        validate_factor_change(new_value, reason)?;

        let source = emission_sources::Entity::find_by_id(source_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::SourceNotFound(source_id))?;

        let old_value = source.factor_value;
        let now = chrono::Utc::now().into();

        let txn = self.db.begin().await?;

        let mut active: emission_sources::ActiveModel = source.into();
        active.factor_value = Set(new_value);
        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;

        let history = factor_history::ActiveModel {
            id: Set(Uuid::new_v4()),
            source_id: Set(source_id),
            old_value: Set(old_value),
            new_value: Set(new_value),
            reason: Set(reason.trim().to_string()),
            changed_by: Set(changed_by),
            changed_at: Set(now),
        };
        history.insert(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            source_id = %source_id,
            %old_value,
            %new_value,
            changed_by = %changed_by,
            "emission factor updated"
        );

        self.cache.invalidate_many(&CATALOG_FAMILIES);
        Ok(updated)
    }

    /// Lists the factor change history of a source, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the source does not exist or the query
    /// fails.
    pub async fn factor_history(
        &self,
        source_id: Uuid,
    ) -> Result<Vec<factor_history::Model>, CatalogStoreError> {
        let key = source_id.to_string();
        if let Some(cached) = self.cache.get(CacheFamily::FactorHistory, &key) {
            return Ok(cached);
        }

        // Distinguish "no changes yet" from "no such source".
        self.get_source(source_id).await?;

        let rows = factor_history::Entity::find()
            .filter(factor_history::Column::SourceId.eq(source_id))
            .order_by_desc(factor_history::Column::ChangedAt)
            .all(&self.db)
            .await?;

        self.cache.put(CacheFamily::FactorHistory, &key, &rows);
        Ok(rows)
    }

    /// Creates a custom source owned by one organization.
    ///
    /// Managers only. The code is generated as
    /// `CUSTOM-{org_code}-{nnn}`, one past the organization's highest
    /// existing suffix, so deleted codes leave gaps instead of being
    /// re-issued.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller lacks the role, the factor is
    /// not positive, the category does not exist, or the insert fails.
    pub async fn create_custom_source(
        &self,
        input: CreateCustomSourceInput,
        actor_role: Role,
    ) -> Result<emission_sources::Model, CatalogStoreError> {
        require(actor_role, Action::ManageFactors)?;

        if input.factor_value <= Decimal::ZERO {
            return Err(CatalogError::NonPositiveFactor.into());
        }

        let category = categories::Entity::find_by_id(input.category_id)
            .one(&self.db)
            .await?;
        if category.is_none() {
            return Err(CatalogStoreError::CategoryNotFound(input.category_id));
        }

        let existing: Vec<String> = emission_sources::Entity::find()
            .select_only()
            .column(emission_sources::Column::Code)
            .filter(emission_sources::Column::OrganizationId.eq(input.organization_id))
            .into_tuple()
            .all(&self.db)
            .await?;
        let code = custom_source_code(&input.organization_code, &existing);

        if self.code_exists(&code).await? {
            return Err(CatalogError::DuplicateCode(code).into());
        }

        let now = chrono::Utc::now().into();
        let source = emission_sources::ActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(input.category_id),
            code: Set(code),
            name: Set(input.name.trim().to_string()),
            factor_value: Set(input.factor_value),
            unit: Set(input.unit.trim().to_string()),
            description: Set(input.description),
            region: Set(input.region),
            reference_year: Set(input.reference_year),
            kind: Set(SourceKind::Custom),
            organization_id: Set(Some(input.organization_id)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = source.insert(&self.db).await?;
        self.cache.invalidate_many(&CATALOG_FAMILIES);
        Ok(created)
    }

    /// Activates or deactivates a source.
    ///
    /// Managers only. Deactivation blocks new entries; existing ones
    /// keep their snapshots.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller lacks the role, the source does
    /// not exist, or the update fails.
    pub async fn set_active(
        &self,
        source_id: Uuid,
        is_active: bool,
        actor_role: Role,
    ) -> Result<emission_sources::Model, CatalogStoreError> {
        require(actor_role, Action::ManageFactors)?;

        let source = emission_sources::Entity::find_by_id(source_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::SourceNotFound(source_id))?;

        let mut active: emission_sources::ActiveModel = source.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(&self.db).await?;

        self.cache.invalidate_many(&CATALOG_FAMILIES);
        Ok(updated)
    }

    /// Deletes a custom source that no ledger entry references.
    ///
    /// Managers only, scoped to the owning organization. System
    /// sources are immutable, and a referenced source cannot be
    /// deleted; deactivate it instead. Factor history cascades away
    /// with the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is a system source, belongs to
    /// another organization, is still referenced, or does not exist.
    pub async fn delete_source(
        &self,
        source_id: Uuid,
        organization_id: Uuid,
        actor_role: Role,
    ) -> Result<(), CatalogStoreError> {
        require(actor_role, Action::ManageFactors)?;

        let source = emission_sources::Entity::find_by_id(source_id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::SourceNotFound(source_id))?;

        if source.organization_id.is_some_and(|owner| owner != organization_id) {
            return Err(CatalogError::SourceNotFound(source_id).into());
        }

        let entry_count = self.source_usage_count(source_id).await?;
        validate_source_deletion(source_id, kind_to_core(&source.kind), entry_count)?;

        emission_sources::Entity::delete_by_id(source_id)
            .exec(&self.db)
            .await?;

        self.cache.invalidate_many(&CATALOG_FAMILIES);
        Ok(())
    }

    /// Counts ledger entries referencing a source, across all states.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn source_usage_count(&self, source_id: Uuid) -> Result<u64, CatalogStoreError> {
        Ok(emission_entries::Entity::find()
            .filter(emission_entries::Column::SourceId.eq(source_id))
            .count(&self.db)
            .await?)
    }

    async fn code_exists(&self, code: &str) -> Result<bool, CatalogStoreError> {
        let count = emission_sources::Entity::find()
            .filter(emission_sources::Column::Code.eq(code))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}

/// Maps a stored source kind to the domain kind.
#[must_use]
pub const fn kind_to_core(kind: &SourceKind) -> carbontrace_core::catalog::SourceKind {
    match kind {
        SourceKind::System => carbontrace_core::catalog::SourceKind::System,
        SourceKind::Custom => carbontrace_core::catalog::SourceKind::Custom,
    }
}

/// Builds the domain view of a source used by entry resolution.
#[must_use]
pub fn source_info(source: &emission_sources::Model) -> SourceInfo {
    SourceInfo {
        id: source.id,
        code: source.code.clone(),
        factor_value: source.factor_value,
        unit: source.unit.clone(),
        is_active: source.is_active,
        kind: kind_to_core(&source.kind),
        organization_id: source.organization_id,
    }
}

/// Cache key for a filtered source listing.
#[must_use]
pub fn sources_cache_key(
    organization_id: Uuid,
    category_id: Option<Uuid>,
    include_inactive: bool,
) -> String {
    let category = category_id.map_or_else(|| "*".to_string(), |id| id.to_string());
    format!("{organization_id}:c={category}:all={include_inactive}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_cache_key_is_org_scoped() {
        let org_a = Uuid::new_v4();
        let org_b = Uuid::new_v4();
        let category = Uuid::new_v4();

        assert_ne!(
            sources_cache_key(org_a, Some(category), false),
            sources_cache_key(org_b, Some(category), false)
        );
        assert_ne!(
            sources_cache_key(org_a, Some(category), false),
            sources_cache_key(org_a, None, false)
        );
        assert_ne!(
            sources_cache_key(org_a, None, false),
            sources_cache_key(org_a, None, true)
        );
    }

    #[test]
    fn test_source_info_mapping() {
        let org = Uuid::new_v4();
        let now = chrono::Utc::now().into();
        let model = emission_sources::Model {
            id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            code: "CUSTOM-ACME-001".to_string(),
            name: "Boiler".to_string(),
            factor_value: rust_decimal_macros::dec!(1.5),
            unit: "kWh".to_string(),
            description: None,
            region: None,
            reference_year: None,
            kind: SourceKind::Custom,
            organization_id: Some(org),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let info = source_info(&model);
        assert_eq!(info.kind, carbontrace_core::catalog::SourceKind::Custom);
        assert_eq!(info.organization_id, Some(org));
        assert_eq!(info.factor_value, rust_decimal_macros::dec!(1.5));
    }
}
