//! `SeaORM` Entity for the categories table.
//!
//! Categories follow the GHG Protocol breakdown: each belongs to one
//! of the three scopes and groups related emission sources.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// 1, 2, or 3.
    pub scope_number: i16,
    /// Stable code like `S1-FUEL` or `S3-06-BUSINESS-TRAVEL`.
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::emission_sources::Entity")]
    EmissionSources,
}

impl Related<super::emission_sources::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmissionSources.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
