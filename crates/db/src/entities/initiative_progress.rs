//! `SeaORM` Entity for the initiative_progress table.
//!
//! Append-only timeline of progress readings for an initiative.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "initiative_progress")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub initiative_id: Uuid,
    /// Completion estimate in [0, 100]; need not be monotonic.
    pub progress_percentage: Decimal,
    /// Free-form status label at the time of the reading.
    pub status_label: Option<String>,
    pub note: Option<String>,
    pub recorded_by: Uuid,
    pub recorded_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::initiatives::Entity",
        from = "Column::InitiativeId",
        to = "super::initiatives::Column::Id"
    )]
    Initiatives,
}

impl Related<super::initiatives::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Initiatives.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
