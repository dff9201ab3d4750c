//! Emissions ledger repository.
//!
//! Inserts snapshot the source factor at write time and store the
//! computed co2e next to it; neither column is ever updated. Decisions
//! are applied with a compare-and-set write so the state machine holds
//! under concurrent deciders.

use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use carbontrace_core::access::{require, Action, Role};
use carbontrace_core::cache::{CacheFamily, ViewCache};
use carbontrace_core::catalog::Scope;
use carbontrace_core::ledger::{
    reporting_period_year, EntryFilter, LedgerError, LedgerService, NewEntryInput,
};
use carbontrace_core::verification::{
    DecisionOutcome, VerificationError, VerificationService, VerificationStatus as CoreStatus,
};
use carbontrace_shared::AppError;

use crate::entities::{
    categories, emission_entries, emission_sources, organizations,
    sea_orm_active_enums::{OrgStatus, VerificationStatus},
};
use crate::repositories::catalog::source_info;

/// Families a ledger mutation must clear.
const LEDGER_FAMILIES: [CacheFamily; 3] = [
    CacheFamily::EntriesByOrg,
    CacheFamily::UnverifiedByOrg,
    CacheFamily::EmissionTotals,
];

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerStoreError {
    /// Entry validation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Decision rejected by the state machine.
    #[error(transparent)]
    Verification(#[from] VerificationError),

    /// Caller lacks the required role.
    #[error(transparent)]
    Access(#[from] carbontrace_core::access::AccessError),

    /// Only unverified entries may be deleted.
    #[error("Entry {0} has been decided and cannot be deleted")]
    CannotDeleteDecided(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<LedgerStoreError> for AppError {
    fn from(err: LedgerStoreError) -> Self {
        let msg = err.to_string();
        match err {
            LedgerStoreError::Ledger(inner) => match inner {
                LedgerError::NonPositiveQuantity
                | LedgerError::EmptyPeriod
                | LedgerError::PeriodOutOfRange { .. }
                | LedgerError::SourceOrganizationMismatch { .. } => Self::Validation(msg),
                LedgerError::SourceInactive(_) | LedgerError::OrganizationNotVerified(_) => {
                    Self::InvalidStateTransition(msg)
                }
                LedgerError::OrganizationNotFound(_)
                | LedgerError::SourceNotFound(_)
                | LedgerError::EntryNotFound(_) => Self::NotFound(msg),
            },
            LedgerStoreError::Verification(inner) => match inner {
                VerificationError::InvalidTransition { .. } => Self::InvalidStateTransition(msg),
                VerificationError::NoteRequired => Self::Validation(msg),
                VerificationError::InsufficientRole(_) => Self::PermissionDenied(msg),
                VerificationError::EntryNotFound(_) => Self::NotFound(msg),
                VerificationError::ConcurrencyConflict(_) => Self::ConcurrencyConflict(msg),
            },
            LedgerStoreError::Access(_) => Self::PermissionDenied(msg),
            LedgerStoreError::CannotDeleteDecided(_) => Self::InvalidStateTransition(msg),
            LedgerStoreError::Database(_) => Self::Database(msg),
        }
    }
}

/// Outcome report for a batch decision.
#[derive(Debug, Default)]
pub struct BatchDecisionReport {
    /// Entries decided successfully.
    pub decided: Vec<Uuid>,
    /// Entries that failed, with the reason each one failed.
    pub failed: Vec<(Uuid, LedgerStoreError)>,
}

impl BatchDecisionReport {
    /// True when every entry in the batch was decided.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Maps the stored status to the domain status.
#[must_use]
pub const fn status_to_core(status: &VerificationStatus) -> CoreStatus {
    match status {
        VerificationStatus::Unverified => CoreStatus::Unverified,
        VerificationStatus::Verified => CoreStatus::Verified,
        VerificationStatus::Rejected => CoreStatus::Rejected,
    }
}

/// Maps the domain status to the stored status.
#[must_use]
pub const fn status_from_core(status: CoreStatus) -> VerificationStatus {
    match status {
        CoreStatus::Unverified => VerificationStatus::Unverified,
        CoreStatus::Verified => VerificationStatus::Verified,
        CoreStatus::Rejected => VerificationStatus::Rejected,
    }
}

/// Emissions ledger repository with read-view caching.
#[derive(Clone)]
pub struct EntryRepository {
    db: DatabaseConnection,
    cache: ViewCache,
}

impl EntryRepository {
    /// Creates a new entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, cache: ViewCache) -> Self {
        Self { db, cache }
    }

    /// Records an activity entry.
    ///
    /// The factor snapshot and co2e are computed here, inside entry
    /// resolution, and written once. New entries always start
    /// unverified.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller lacks the role, the organization
    /// is not verified, the source is unusable, validation fails, or
    /// the insert fails.
    pub async fn add_entry(
        &self,
        input: NewEntryInput,
        actor_role: Role,
    ) -> Result<emission_entries::Model, LedgerStoreError> {
        require(actor_role, Action::AddEntry)?;

        let organization = organizations::Entity::find_by_id(input.organization_id)
            .one(&self.db)
            .await?
            .ok_or(LedgerError::OrganizationNotFound(input.organization_id))?;
        let organization_verified = organization.status == OrgStatus::Verified;

        let source = emission_sources::Entity::find_by_id(input.source_id)
            .one(&self.db)
            .await?
            .ok_or(LedgerError::SourceNotFound(input.source_id))?;

        let resolved =
            LedgerService::resolve_entry(input, &source_info(&source), organization_verified)?;

        let now = chrono::Utc::now().into();
        let entry = emission_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(resolved.organization_id),
            source_id: Set(resolved.source_id),
            quantity: Set(resolved.quantity),
            unit: Set(resolved.unit),
            factor_value_at_entry: Set(resolved.factor_value_at_entry),
            co2e: Set(resolved.co2e),
            reporting_period: Set(resolved.reporting_period),
            verification_status: Set(VerificationStatus::Unverified),
            entered_by: Set(resolved.entered_by),
            verified_by: Set(None),
            verified_at: Set(None),
            rejection_note: Set(None),
            notes: Set(resolved.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = entry.insert(&self.db).await?;

        tracing::info!(
            entry_id = %created.id,
            organization_id = %created.organization_id,
            source_id = %created.source_id,
            co2e = %created.co2e,
            "emission entry recorded"
        );

        self.cache.invalidate_many(&LEDGER_FAMILIES);
        Ok(created)
    }

    /// Fetches a single entry scoped to an organization.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::EntryNotFound`] if absent or owned by a
    /// different organization.
    pub async fn get_entry(
        &self,
        organization_id: Uuid,
        entry_id: Uuid,
    ) -> Result<emission_entries::Model, LedgerStoreError> {
        let entry = emission_entries::Entity::find_by_id(entry_id)
            .filter(emission_entries::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        Ok(entry)
    }

    /// Lists an organization's entries with optional filters, newest
    /// first. Served through the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_entries(
        &self,
        organization_id: Uuid,
        filter: &EntryFilter,
    ) -> Result<Vec<emission_entries::Model>, LedgerStoreError> {
        let key = entries_cache_key(organization_id, filter);
        if let Some(cached) = self.cache.get(CacheFamily::EntriesByOrg, &key) {
            return Ok(cached);
        }

        let mut query = emission_entries::Entity::find()
            .filter(emission_entries::Column::OrganizationId.eq(organization_id));

        if let Some(period) = &filter.period {
            query = query.filter(emission_entries::Column::ReportingPeriod.eq(period));
        }
        if let Some(status) = filter.status {
            query = query.filter(
                emission_entries::Column::VerificationStatus.eq(status_from_core(status)),
            );
        }
        if let Some(scope) = filter.scope {
            query = query
                .join(
                    JoinType::InnerJoin,
                    emission_entries::Relation::EmissionSources.def(),
                )
                .join(
                    JoinType::InnerJoin,
                    emission_sources::Relation::Categories.def(),
                )
                .filter(categories::Column::ScopeNumber.eq(scope.number()));
        }

        let entries = query
            .order_by_desc(emission_entries::Column::CreatedAt)
            .all(&self.db)
            .await?;

        self.cache.put(CacheFamily::EntriesByOrg, &key, &entries);
        Ok(entries)
    }

    /// The verification work queue: unverified entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_unverified(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<emission_entries::Model>, LedgerStoreError> {
        let key = organization_id.to_string();
        if let Some(cached) = self.cache.get(CacheFamily::UnverifiedByOrg, &key) {
            return Ok(cached);
        }

        let entries = emission_entries::Entity::find()
            .filter(emission_entries::Column::OrganizationId.eq(organization_id))
            .filter(
                emission_entries::Column::VerificationStatus.eq(VerificationStatus::Unverified),
            )
            .order_by_asc(emission_entries::Column::CreatedAt)
            .all(&self.db)
            .await?;

        self.cache.put(CacheFamily::UnverifiedByOrg, &key, &entries);
        Ok(entries)
    }

    /// Decides an unverified entry.
    ///
    /// The domain service validates the decision; the write then
    /// re-checks `unverified` in its predicate. Zero rows affected
    /// means another decider got there first, reported as a conflict
    /// the caller can retry against fresh state.
    ///
    /// # Errors
    ///
    /// Returns an error if the role is too low, the entry is missing
    /// or already decided, a rejection lacks a note, or the write
    /// conflicts or fails.
    pub async fn decide(
        &self,
        organization_id: Uuid,
        entry_id: Uuid,
        decider_id: Uuid,
        decider_role: Role,
        outcome: DecisionOutcome,
        note: Option<String>,
    ) -> Result<emission_entries::Model, LedgerStoreError> {
        let entry = self.get_entry(organization_id, entry_id).await?;

        let decision = VerificationService::decide(
            status_to_core(&entry.verification_status),
            decider_id,
            decider_role,
            outcome,
            note,
        )?;

        let decided_at: sea_orm::prelude::DateTimeWithTimeZone = decision.decided_at.into();
        let result = emission_entries::Entity::update_many()
            .col_expr(
                emission_entries::Column::VerificationStatus,
                Expr::value(status_from_core(decision.new_status)),
            )
            .col_expr(
                emission_entries::Column::VerifiedBy,
                Expr::value(Some(decision.decided_by)),
            )
            .col_expr(
                emission_entries::Column::VerifiedAt,
                Expr::value(Some(decided_at)),
            )
            .col_expr(
                emission_entries::Column::RejectionNote,
                Expr::value(decision.rejection_note.clone()),
            )
            .col_expr(emission_entries::Column::UpdatedAt, Expr::value(decided_at))
            .filter(emission_entries::Column::Id.eq(entry_id))
            .filter(
                emission_entries::Column::VerificationStatus.eq(VerificationStatus::Unverified),
            )
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(VerificationError::ConcurrencyConflict(entry_id).into());
        }

        tracing::info!(
            entry_id = %entry_id,
            new_status = decision.new_status.as_str(),
            decided_by = %decider_id,
            "emission entry decided"
        );

        self.cache.invalidate_many(&LEDGER_FAMILIES);
        self.get_entry(organization_id, entry_id).await
    }

    /// Decides a batch of entries with the same outcome.
    ///
    /// Each entry is decided independently; one failure does not stop
    /// the rest. The report names every entry that failed and why.
    ///
    /// # Errors
    ///
    /// This method itself does not fail; per-entry failures are
    /// collected in the report.
    pub async fn decide_many(
        &self,
        organization_id: Uuid,
        entry_ids: &[Uuid],
        decider_id: Uuid,
        decider_role: Role,
        outcome: DecisionOutcome,
        note: Option<String>,
    ) -> BatchDecisionReport {
        let mut report = BatchDecisionReport::default();

        for &entry_id in entry_ids {
            match self
                .decide(
                    organization_id,
                    entry_id,
                    decider_id,
                    decider_role,
                    outcome,
                    note.clone(),
                )
                .await
            {
                Ok(_) => report.decided.push(entry_id),
                Err(err) => report.failed.push((entry_id, err)),
            }
        }

        report
    }

    /// Deletes an entry that has not yet been decided.
    ///
    /// Managers only. Decided entries are part of the audit record
    /// and cannot be removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller lacks the role, the entry does
    /// not exist, or it has already been decided.
    pub async fn delete_entry(
        &self,
        organization_id: Uuid,
        entry_id: Uuid,
        actor_role: Role,
    ) -> Result<(), LedgerStoreError> {
        require(actor_role, Action::DeleteEntry)?;

        let result = emission_entries::Entity::delete_by_id(entry_id)
            .filter(emission_entries::Column::OrganizationId.eq(organization_id))
            .filter(
                emission_entries::Column::VerificationStatus.eq(VerificationStatus::Unverified),
            )
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            // Either missing or already decided; look to tell apart.
            let entry = self.get_entry(organization_id, entry_id).await?;
            return Err(LedgerStoreError::CannotDeleteDecided(entry.id));
        }

        self.cache.invalidate_many(&LEDGER_FAMILIES);
        Ok(())
    }

    /// Sums verified co2e per scope for an organization, optionally
    /// restricted to one reporting period token.
    ///
    /// Only verified entries count toward reported totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn verified_totals_by_scope(
        &self,
        organization_id: Uuid,
        period: Option<&str>,
    ) -> Result<Vec<(Scope, Decimal)>, LedgerStoreError> {
        let key = format!("{organization_id}:scope:p={}", period.unwrap_or("*"));
        if let Some(cached) = self.cache.get::<Vec<(Scope, Decimal)>>(CacheFamily::EmissionTotals, &key) {
            return Ok(cached);
        }

        let mut query = emission_entries::Entity::find()
            .select_only()
            .column(categories::Column::ScopeNumber)
            .column(emission_entries::Column::Co2e)
            .join(
                JoinType::InnerJoin,
                emission_entries::Relation::EmissionSources.def(),
            )
            .join(
                JoinType::InnerJoin,
                emission_sources::Relation::Categories.def(),
            )
            .filter(emission_entries::Column::OrganizationId.eq(organization_id))
            .filter(emission_entries::Column::VerificationStatus.eq(VerificationStatus::Verified));

        if let Some(period) = period {
            query = query.filter(emission_entries::Column::ReportingPeriod.eq(period));
        }

        let rows: Vec<(i16, Decimal)> = query.into_tuple().all(&self.db).await?;
        let totals = sum_by_scope(&rows);

        self.cache.put(CacheFamily::EmissionTotals, &key, &totals);
        Ok(totals)
    }

    /// Sums verified co2e for one calendar year.
    ///
    /// Period tokens are matched on their leading year, so `2024` and
    /// `2024-Q3` both land in 2024.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn verified_total_for_year(
        &self,
        organization_id: Uuid,
        year: i32,
    ) -> Result<Decimal, LedgerStoreError> {
        let key = format!("{organization_id}:year:{year}");
        if let Some(cached) = self.cache.get(CacheFamily::EmissionTotals, &key) {
            return Ok(cached);
        }

        let rows: Vec<(String, Decimal)> = emission_entries::Entity::find()
            .select_only()
            .column(emission_entries::Column::ReportingPeriod)
            .column(emission_entries::Column::Co2e)
            .filter(emission_entries::Column::OrganizationId.eq(organization_id))
            .filter(emission_entries::Column::VerificationStatus.eq(VerificationStatus::Verified))
            .filter(emission_entries::Column::ReportingPeriod.starts_with(year.to_string()))
            .into_tuple()
            .all(&self.db)
            .await?;

        let total = total_for_year(&rows, year);

        self.cache.put(CacheFamily::EmissionTotals, &key, &total);
        Ok(total)
    }
}

/// Cache key for a filtered entry listing.
#[must_use]
pub fn entries_cache_key(organization_id: Uuid, filter: &EntryFilter) -> String {
    format!("{organization_id}:{}", filter.cache_key_part())
}

/// Aggregates (scope_number, co2e) rows into per-scope totals,
/// ordered scope 1 to 3. Rows with an unknown scope number are
/// dropped.
#[must_use]
pub fn sum_by_scope(rows: &[(i16, Decimal)]) -> Vec<(Scope, Decimal)> {
    let mut totals = [Decimal::ZERO; 3];
    for &(scope_number, co2e) in rows {
        if let Some(scope) = Scope::from_number(scope_number) {
            let idx = (scope.number() - 1) as usize;
            totals[idx] += co2e;
        }
    }

    [Scope::Scope1, Scope::Scope2, Scope::Scope3]
        .into_iter()
        .zip(totals)
        .collect()
}

/// Sums co2e over rows whose period token parses to the given year.
///
/// The SQL prefix filter is coarse ("199" would match "1990-Q1"); the
/// exact year check here is what decides membership.
#[must_use]
pub fn total_for_year(rows: &[(String, Decimal)], year: i32) -> Decimal {
    rows.iter()
        .filter(|(period, _)| reporting_period_year(period) == Some(year))
        .map(|&(_, co2e)| co2e)
        .sum()
}

/// Replays one decision over in-memory entry statuses, returning
/// per-entry results in input order.
///
/// This is the pure shape of [`EntryRepository::decide_many`]: each
/// entry is decided independently, and a failed entry keeps its
/// current status while the rest of the batch proceeds.
#[must_use]
pub fn simulate_decide_many(
    statuses: &[CoreStatus],
    decider_id: Uuid,
    decider_role: Role,
    outcome: DecisionOutcome,
    note: Option<&str>,
) -> Vec<Result<CoreStatus, VerificationError>> {
    statuses
        .iter()
        .map(|&status| {
            VerificationService::decide(
                status,
                decider_id,
                decider_role,
                outcome,
                note.map(str::to_string),
            )
            .map(|decision| decision.new_status)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_boundary_mapping() {
        let entry_id = Uuid::new_v4();
        let conflict: AppError =
            LedgerStoreError::from(VerificationError::ConcurrencyConflict(entry_id)).into();
        assert_eq!(conflict.error_code(), "CONCURRENCY_CONFLICT");
        assert!(conflict.is_retryable());

        let decided: AppError = LedgerStoreError::CannotDeleteDecided(entry_id).into();
        assert_eq!(decided.status_code(), 422);
        assert!(!decided.is_retryable());

        // A missing organization is absence, not a lifecycle error.
        let missing: AppError =
            LedgerStoreError::from(LedgerError::OrganizationNotFound(entry_id)).into();
        assert_eq!(missing.error_code(), "NOT_FOUND");
        assert_eq!(missing.status_code(), 404);

        let unverified: AppError =
            LedgerStoreError::from(LedgerError::OrganizationNotVerified(entry_id)).into();
        assert_eq!(unverified.status_code(), 422);
    }

    #[test]
    fn test_batch_decision_partial_success() {
        // Three entries, the middle one already verified: the batch
        // decides 1 and 3 and reports 2 as failed, leaving it as-is.
        let decider = Uuid::new_v4();
        let statuses = [
            CoreStatus::Unverified,
            CoreStatus::Verified,
            CoreStatus::Unverified,
        ];

        let results = simulate_decide_many(
            &statuses,
            decider,
            Role::Manager,
            DecisionOutcome::Verified,
            None,
        );

        assert_eq!(results[0], Ok(CoreStatus::Verified));
        assert_eq!(
            results[1],
            Err(VerificationError::InvalidTransition {
                from: CoreStatus::Verified,
                to: CoreStatus::Verified,
            })
        );
        assert_eq!(results[2], Ok(CoreStatus::Verified));
    }

    #[test]
    fn test_batch_rejection_keeps_note_per_entry() {
        let decider = Uuid::new_v4();
        let statuses = [CoreStatus::Unverified, CoreStatus::Rejected];

        let results = simulate_decide_many(
            &statuses,
            decider,
            Role::Admin,
            DecisionOutcome::Rejected,
            Some("quantity implausible"),
        );

        assert_eq!(results[0], Ok(CoreStatus::Rejected));
        assert!(results[1].is_err());
    }

    #[test]
    fn test_sum_by_scope() {
        let rows = vec![
            (1i16, dec!(100.5)),
            (2, dec!(50)),
            (1, dec!(10)),
            (3, dec!(7.25)),
            (9, dec!(999)), // unknown scope, ignored
        ];

        let totals = sum_by_scope(&rows);
        assert_eq!(
            totals,
            vec![
                (Scope::Scope1, dec!(110.5)),
                (Scope::Scope2, dec!(50)),
                (Scope::Scope3, dec!(7.25)),
            ]
        );
    }

    #[test]
    fn test_sum_by_scope_empty() {
        let totals = sum_by_scope(&[]);
        assert!(totals.iter().all(|&(_, total)| total == Decimal::ZERO));
    }

    #[test]
    fn test_total_for_year_matches_on_leading_year() {
        let rows = vec![
            ("2024".to_string(), dec!(100)),
            ("2024-Q1".to_string(), dec!(25)),
            ("2023".to_string(), dec!(500)),
            ("2024-H2".to_string(), dec!(10.5)),
        ];

        assert_eq!(total_for_year(&rows, 2024), dec!(135.5));
        assert_eq!(total_for_year(&rows, 2023), dec!(500));
        assert_eq!(total_for_year(&rows, 2022), Decimal::ZERO);
    }

    #[test]
    fn test_entries_cache_key_embeds_org_and_filter() {
        let org = Uuid::new_v4();
        let unfiltered = entries_cache_key(org, &EntryFilter::none());
        let filtered = entries_cache_key(
            org,
            &EntryFilter {
                period: Some("2024".into()),
                ..EntryFilter::none()
            },
        );

        assert!(unfiltered.starts_with(&org.to_string()));
        assert_ne!(unfiltered, filtered);
    }

    #[test]
    fn test_batch_report_completeness() {
        let mut report = BatchDecisionReport::default();
        report.decided.push(Uuid::new_v4());
        assert!(report.is_complete());

        report.failed.push((
            Uuid::new_v4(),
            LedgerStoreError::Verification(VerificationError::NoteRequired),
        ));
        assert!(!report.is_complete());
    }

    #[test]
    fn test_status_mapping_roundtrip() {
        for status in [
            CoreStatus::Unverified,
            CoreStatus::Verified,
            CoreStatus::Rejected,
        ] {
            assert_eq!(status_to_core(&status_from_core(status)), status);
        }
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn co2e_strategy() -> impl Strategy<Value = Decimal> {
            (1i64..1_000_000i64, 0u32..4u32).prop_map(|(mantissa, scale)| {
                Decimal::new(mantissa, scale)
            })
        }

        proptest! {
            /// Scope totals partition the input: the three per-scope
            /// sums add up to the sum of every known-scope row.
            #[test]
            fn prop_scope_totals_partition_rows(
                rows in prop::collection::vec((1i16..=3i16, co2e_strategy()), 0..40)
            ) {
                let expected: Decimal = rows.iter().map(|&(_, c)| c).sum();
                let by_scope = sum_by_scope(&rows);
                let total: Decimal = by_scope.iter().map(|&(_, t)| t).sum();
                prop_assert_eq!(total, expected);
            }

            /// Yearly totals only count rows whose token starts with
            /// that exact year.
            #[test]
            fn prop_year_total_excludes_other_years(
                year in 1990i32..2050i32,
                amounts in prop::collection::vec(co2e_strategy(), 1..20)
            ) {
                let mut rows: Vec<(String, Decimal)> = amounts
                    .iter()
                    .map(|&c| (year.to_string(), c))
                    .collect();
                rows.push(((year + 1).to_string(), Decimal::ONE_HUNDRED));

                let expected: Decimal = amounts.iter().copied().sum();
                prop_assert_eq!(total_for_year(&rows, year), expected);
            }
        }
    }
}
