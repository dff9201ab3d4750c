//! Reduction goal and initiative repository.
//!
//! Goal creation computes the baseline from verified entries and
//! freezes it onto the goal row; progress math afterward always reads
//! the frozen number, never the live ledger for the baseline year.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use carbontrace_core::access::{require, Action, Role};
use carbontrace_core::cache::{CacheFamily, ViewCache};
use carbontrace_core::reduction::{
    percent_delta, validate_goal_shape, validate_progress_percentage, GoalSummary, ProgressMetrics,
    ReductionError,
};
use carbontrace_shared::AppError;

use crate::entities::{
    emission_entries, initiative_progress, initiatives, reduction_goals,
    sea_orm_active_enums::{GoalStatus, InitiativeStatus, VerificationStatus},
};
use crate::repositories::entry::total_for_year;

/// Families a tracker mutation must clear.
const TRACKER_FAMILIES: [CacheFamily; 2] =
    [CacheFamily::GoalsByOrg, CacheFamily::InitiativesByGoal];

/// Error types for reduction tracking operations.
#[derive(Debug, thiserror::Error)]
pub enum ReductionStoreError {
    /// Goal or progress validation failed.
    #[error(transparent)]
    Reduction(#[from] ReductionError),

    /// Caller lacks the required role.
    #[error(transparent)]
    Access(#[from] carbontrace_core::access::AccessError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ReductionStoreError> for AppError {
    fn from(err: ReductionStoreError) -> Self {
        let msg = err.to_string();
        match err {
            ReductionStoreError::Reduction(inner) => match inner {
                ReductionError::InvalidYearRange { .. }
                | ReductionError::InvalidTargetPercentage(_)
                | ReductionError::InvalidProgressPercentage(_) => Self::Validation(msg),
                ReductionError::InsufficientBaselineData { .. } => {
                    Self::InsufficientBaselineData(msg)
                }
                ReductionError::GoalNotFound(_) | ReductionError::InitiativeNotFound(_) => {
                    Self::NotFound(msg)
                }
            },
            ReductionStoreError::Access(_) => Self::PermissionDenied(msg),
            ReductionStoreError::Database(_) => Self::Database(msg),
        }
    }
}

/// Input for creating a reduction goal.
#[derive(Debug, Clone)]
pub struct CreateGoalInput {
    /// Owning organization.
    pub organization_id: Uuid,
    /// Display name.
    pub name: String,
    /// Year the baseline is computed over.
    pub baseline_year: i32,
    /// Year the target must be met by.
    pub target_year: i32,
    /// Percent reduction against the baseline, in (0, 100].
    pub target_reduction_percentage: Decimal,
    /// Creating user.
    pub created_by: Uuid,
}

/// Input for creating an initiative under a goal.
#[derive(Debug, Clone)]
pub struct CreateInitiativeInput {
    /// Parent goal.
    pub goal_id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form grouping label, e.g. `energy efficiency`.
    pub category: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Planned annual reduction in kg CO2e.
    pub estimated_reduction: Option<Decimal>,
    /// Date the initiative is planned to complete by.
    pub planned_completion: Option<chrono::NaiveDate>,
    /// Creating user.
    pub created_by: Uuid,
}

/// A goal's derived progress at a point in time.
#[derive(Debug, Clone)]
pub struct GoalProgress {
    /// The goal row the numbers were computed for.
    pub goal: reduction_goals::Model,
    /// Verified co2e total for the current year.
    pub current_year_total: Decimal,
    /// Percent change of the current year against the frozen
    /// baseline; `None` when the baseline is zero.
    pub percent_delta: Option<Decimal>,
    /// Target, achieved, and expected progress numbers.
    pub metrics: ProgressMetrics,
}

/// Reduction tracker repository with read-view caching.
#[derive(Clone)]
pub struct ReductionRepository {
    db: DatabaseConnection,
    cache: ViewCache,
}

impl ReductionRepository {
    /// Creates a new reduction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, cache: ViewCache) -> Self {
        Self { db, cache }
    }

    /// Creates a goal with a frozen baseline.
    ///
    /// Managers only. The baseline is the sum of verified co2e over
    /// the baseline year at this moment; entries verified later do
    /// not move it. Creation fails when no verified data exists for
    /// the baseline year.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller lacks the role, the year range
    /// or target percentage is invalid, the baseline year has no
    /// verified entries, or the insert fails.
    pub async fn create_goal(
        &self,
        input: CreateGoalInput,
        actor_role: Role,
    ) -> Result<reduction_goals::Model, ReductionStoreError> {
        require(actor_role, Action::ManageGoals)?;
        validate_goal_shape(
            input.baseline_year,
            input.target_year,
            input.target_reduction_percentage,
        )?;

        let baseline_total = self
            .verified_year_total(input.organization_id, input.baseline_year)
            .await?;
        if baseline_total == Decimal::ZERO {
            return Err(ReductionError::InsufficientBaselineData {
                baseline_year: input.baseline_year,
            }
            .into());
        }

        let now = chrono::Utc::now().into();
        let goal = reduction_goals::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(input.organization_id),
            name: Set(input.name.trim().to_string()),
            baseline_year: Set(input.baseline_year),
            baseline_emissions_total: Set(baseline_total),
            target_year: Set(input.target_year),
            target_reduction_percentage: Set(input.target_reduction_percentage),
            status: Set(GoalStatus::Active),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = goal.insert(&self.db).await?;

        tracing::info!(
            goal_id = %created.id,
            organization_id = %created.organization_id,
            baseline_year = created.baseline_year,
            baseline_total = %created.baseline_emissions_total,
            "reduction goal created"
        );

        self.cache.invalidate_many(&TRACKER_FAMILIES);
        Ok(created)
    }

    /// Fetches a goal scoped to an organization.
    ///
    /// # Errors
    ///
    /// Returns [`ReductionError::GoalNotFound`] if absent or owned by
    /// another organization.
    pub async fn get_goal(
        &self,
        organization_id: Uuid,
        goal_id: Uuid,
    ) -> Result<reduction_goals::Model, ReductionStoreError> {
        let goal = reduction_goals::Entity::find_by_id(goal_id)
            .filter(reduction_goals::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .ok_or(ReductionError::GoalNotFound(goal_id))?;

        Ok(goal)
    }

    /// Lists an organization's goals, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_goals(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<reduction_goals::Model>, ReductionStoreError> {
        let key = organization_id.to_string();
        if let Some(cached) = self.cache.get(CacheFamily::GoalsByOrg, &key) {
            return Ok(cached);
        }

        let goals = reduction_goals::Entity::find()
            .filter(reduction_goals::Column::OrganizationId.eq(organization_id))
            .order_by_desc(reduction_goals::Column::CreatedAt)
            .all(&self.db)
            .await?;

        self.cache.put(CacheFamily::GoalsByOrg, &key, &goals);
        Ok(goals)
    }

    /// Updates a goal's status. Managers only.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller lacks the role, the goal does
    /// not exist, or the update fails.
    pub async fn set_goal_status(
        &self,
        organization_id: Uuid,
        goal_id: Uuid,
        status: GoalStatus,
        actor_role: Role,
    ) -> Result<reduction_goals::Model, ReductionStoreError> {
        require(actor_role, Action::ManageGoals)?;

        let goal = self.get_goal(organization_id, goal_id).await?;

        let mut active: reduction_goals::ActiveModel = goal.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(&self.db).await?;

        self.cache.invalidate_many(&TRACKER_FAMILIES);
        Ok(updated)
    }

    /// Computes a goal's progress against its frozen baseline.
    ///
    /// # Errors
    ///
    /// Returns an error if the goal does not exist or the total query
    /// fails.
    pub async fn goal_progress(
        &self,
        organization_id: Uuid,
        goal_id: Uuid,
        current_year: i32,
    ) -> Result<GoalProgress, ReductionStoreError> {
        let goal = self.get_goal(organization_id, goal_id).await?;
        let current_year_total = self.verified_year_total(organization_id, current_year).await?;

        let summary = goal_summary(&goal);
        Ok(GoalProgress {
            percent_delta: percent_delta(current_year_total, &summary),
            metrics: ProgressMetrics::compute(&summary, current_year, current_year_total),
            current_year_total,
            goal,
        })
    }

    /// Creates an initiative under a goal. Managers only.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller lacks the role, the goal does
    /// not exist, or the insert fails.
    pub async fn create_initiative(
        &self,
        organization_id: Uuid,
        input: CreateInitiativeInput,
        actor_role: Role,
    ) -> Result<initiatives::Model, ReductionStoreError> {
        require(actor_role, Action::ManageGoals)?;
        self.get_goal(organization_id, input.goal_id).await?;

        let now = chrono::Utc::now().into();
        let initiative = initiatives::ActiveModel {
            id: Set(Uuid::new_v4()),
            goal_id: Set(input.goal_id),
            name: Set(input.name.trim().to_string()),
            category: Set(input.category),
            description: Set(input.description),
            status: Set(InitiativeStatus::Planned),
            estimated_reduction: Set(input.estimated_reduction),
            actual_reduction: Set(None),
            planned_completion: Set(input.planned_completion),
            actual_completion: Set(None),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = initiative.insert(&self.db).await?;
        self.cache.invalidate(CacheFamily::InitiativesByGoal);
        Ok(created)
    }

    /// Lists a goal's initiatives, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_initiatives(
        &self,
        goal_id: Uuid,
    ) -> Result<Vec<initiatives::Model>, ReductionStoreError> {
        let key = goal_id.to_string();
        if let Some(cached) = self.cache.get(CacheFamily::InitiativesByGoal, &key) {
            return Ok(cached);
        }

        let rows = initiatives::Entity::find()
            .filter(initiatives::Column::GoalId.eq(goal_id))
            .order_by_desc(initiatives::Column::CreatedAt)
            .all(&self.db)
            .await?;

        self.cache.put(CacheFamily::InitiativesByGoal, &key, &rows);
        Ok(rows)
    }

    /// Updates an initiative's status, recording the measured
    /// reduction when one is supplied. Completing an initiative stamps
    /// its actual completion date. Managers only.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller lacks the role, the initiative
    /// does not exist, or the update fails.
    pub async fn set_initiative_status(
        &self,
        initiative_id: Uuid,
        status: InitiativeStatus,
        actual_reduction: Option<Decimal>,
        actor_role: Role,
    ) -> Result<initiatives::Model, ReductionStoreError> {
        require(actor_role, Action::ManageGoals)?;

        let initiative = initiatives::Entity::find_by_id(initiative_id)
            .one(&self.db)
            .await?
            .ok_or(ReductionError::InitiativeNotFound(initiative_id))?;

        let now = chrono::Utc::now();
        let mut active: initiatives::ActiveModel = initiative.into();
        if status == InitiativeStatus::Completed {
            active.actual_completion = Set(Some(now.date_naive()));
        }
        active.status = Set(status);
        if actual_reduction.is_some() {
            active.actual_reduction = Set(actual_reduction);
        }
        active.updated_at = Set(now.into());
        let updated = active.update(&self.db).await?;

        self.cache.invalidate(CacheFamily::InitiativesByGoal);
        Ok(updated)
    }

    /// Appends a progress reading to an initiative's timeline.
    ///
    /// Managers only, like every other tracker mutation. Readings need
    /// not be monotonic; a regression is recorded as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller lacks the role, the percentage
    /// is outside [0, 100], the initiative does not exist, or the
    /// insert fails.
    pub async fn log_progress(
        &self,
        initiative_id: Uuid,
        progress_percentage: Decimal,
        status_label: Option<String>,
        note: Option<String>,
        recorded_by: Uuid,
        actor_role: Role,
    ) -> Result<initiative_progress::Model, ReductionStoreError> {
        require(actor_role, Action::ManageGoals)?;
        validate_progress_percentage(progress_percentage)?;

        let exists = initiatives::Entity::find_by_id(initiative_id)
            .one(&self.db)
            .await?;
        if exists.is_none() {
            return Err(ReductionError::InitiativeNotFound(initiative_id).into());
        }

        let reading = initiative_progress::ActiveModel {
            id: Set(Uuid::new_v4()),
            initiative_id: Set(initiative_id),
            progress_percentage: Set(progress_percentage),
            status_label: Set(status_label),
            note: Set(note),
            recorded_by: Set(recorded_by),
            recorded_at: Set(chrono::Utc::now().into()),
        };

        let created = reading.insert(&self.db).await?;
        self.cache.invalidate(CacheFamily::InitiativesByGoal);
        Ok(created)
    }

    /// An initiative's progress timeline, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn progress_timeline(
        &self,
        initiative_id: Uuid,
    ) -> Result<Vec<initiative_progress::Model>, ReductionStoreError> {
        Ok(initiative_progress::Entity::find()
            .filter(initiative_progress::Column::InitiativeId.eq(initiative_id))
            .order_by_asc(initiative_progress::Column::RecordedAt)
            .all(&self.db)
            .await?)
    }

    /// Sum of verified co2e for one calendar year, matched on the
    /// leading year of the period token.
    async fn verified_year_total(
        &self,
        organization_id: Uuid,
        year: i32,
    ) -> Result<Decimal, ReductionStoreError> {
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

        Ok(total_for_year(&rows, year))
    }
}

/// Extracts the numbers progress math needs from a goal row.
#[must_use]
pub fn goal_summary(goal: &reduction_goals::Model) -> GoalSummary {
    GoalSummary {
        baseline_year: goal.baseline_year,
        baseline_emissions_total: goal.baseline_emissions_total,
        target_year: goal.target_year,
        target_reduction_percentage: goal.target_reduction_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tracker_mutations_denied_below_manager() {
        // Progress logging gates on the same action as every other
        // tracker mutation.
        let denied = require(Role::NormalUser, Action::ManageGoals).unwrap_err();
        let err = ReductionStoreError::from(denied);
        assert!(matches!(err, ReductionStoreError::Access(_)));

        assert!(require(Role::Manager, Action::ManageGoals).is_ok());
    }

    #[test]
    fn test_goal_summary_mapping() {
        let now = chrono::Utc::now().into();
        let goal = reduction_goals::Model {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            name: "Net 40 by 2030".to_string(),
            baseline_year: 2020,
            baseline_emissions_total: dec!(1250.75),
            target_year: 2030,
            target_reduction_percentage: dec!(40),
            status: GoalStatus::Active,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };

        let summary = goal_summary(&goal);
        assert_eq!(summary.baseline_year, 2020);
        assert_eq!(summary.baseline_emissions_total, dec!(1250.75));
        assert_eq!(summary.target_year, 2030);

        let metrics = ProgressMetrics::compute(&summary, 2025, dec!(1000));
        assert!(metrics.reduction_achieved > Decimal::ZERO);
    }
}
