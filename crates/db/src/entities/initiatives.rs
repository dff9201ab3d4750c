//! `SeaORM` Entity for the initiatives table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::InitiativeStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "initiatives")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub goal_id: Uuid,
    pub name: String,
    /// Free-form grouping label, e.g. `energy efficiency`.
    pub category: Option<String>,
    pub description: Option<String>,
    pub status: InitiativeStatus,
    /// Planned annual reduction in kg CO2e.
    pub estimated_reduction: Option<Decimal>,
    /// Measured reduction once completed.
    pub actual_reduction: Option<Decimal>,
    pub planned_completion: Option<Date>,
    pub actual_completion: Option<Date>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::reduction_goals::Entity",
        from = "Column::GoalId",
        to = "super::reduction_goals::Column::Id"
    )]
    ReductionGoals,
    #[sea_orm(has_many = "super::initiative_progress::Entity")]
    InitiativeProgress,
}

impl Related<super::reduction_goals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReductionGoals.def()
    }
}

impl Related<super::initiative_progress::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InitiativeProgress.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
