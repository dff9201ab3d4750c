//! `SeaORM` Entity for the factor_history table.
//!
//! Append-only audit trail of factor changes. Rows are never updated
//! or deleted individually; the trail cascades away only when its
//! source is deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "factor_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub source_id: Uuid,
    pub old_value: Decimal,
    pub new_value: Decimal,
    pub reason: String,
    pub changed_by: Uuid,
    pub changed_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::emission_sources::Entity",
        from = "Column::SourceId",
        to = "super::emission_sources::Column::Id"
    )]
    EmissionSources,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ChangedBy",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::emission_sources::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmissionSources.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
