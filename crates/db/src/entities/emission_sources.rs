//! `SeaORM` Entity for the emission_sources table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::SourceKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "emission_sources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category_id: Uuid,
    /// Unique code like `S1-F-001` or `CUSTOM-ACME-003`.
    pub code: String,
    pub name: String,
    /// Current conversion factor in kg CO2e per unit.
    pub factor_value: Decimal,
    /// Activity unit the factor applies to, e.g. `kWh` or `litre`.
    pub unit: String,
    pub description: Option<String>,
    /// Region the factor was published for, e.g. `UK`.
    pub region: Option<String>,
    /// Publication year of the factor dataset.
    pub reference_year: Option<i32>,
    pub kind: SourceKind,
    /// Owning organization for custom sources; NULL for system ones.
    pub organization_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
    #[sea_orm(has_many = "super::factor_history::Entity")]
    FactorHistory,
    #[sea_orm(has_many = "super::emission_entries::Entity")]
    EmissionEntries,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::factor_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FactorHistory.def()
    }
}

impl Related<super::emission_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmissionEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
