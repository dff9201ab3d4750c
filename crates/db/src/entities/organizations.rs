//! `SeaORM` Entity for the organizations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::OrgStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// Short unique code, embedded in custom source codes.
    pub code: String,
    pub industry: Option<String>,
    pub status: OrgStatus,
    /// Default reference year for reduction baselines.
    pub baseline_year: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::users::Entity")]
    Users,
    #[sea_orm(has_many = "super::emission_entries::Entity")]
    EmissionEntries,
    #[sea_orm(has_many = "super::reduction_goals::Entity")]
    ReductionGoals,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::emission_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmissionEntries.def()
    }
}

impl Related<super::reduction_goals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReductionGoals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
