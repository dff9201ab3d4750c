//! `SeaORM` Entity for the reduction_goals table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::GoalStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "reduction_goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub baseline_year: i32,
    /// Frozen at creation from verified entries; never recomputed.
    pub baseline_emissions_total: Decimal,
    pub target_year: i32,
    pub target_reduction_percentage: Decimal,
    pub status: GoalStatus,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id"
    )]
    Organizations,
    #[sea_orm(has_many = "super::initiatives::Entity")]
    Initiatives,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl Related<super::initiatives::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Initiatives.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
