//! `SeaORM` Entity for the emission_entries table.
//!
//! `factor_value_at_entry` and `co2e` are written once at insert and
//! never touched again; later factor edits do not reach back into the
//! ledger.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::VerificationStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "emission_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub source_id: Uuid,
    pub quantity: Decimal,
    pub unit: String,
    /// Snapshot of the source factor at insert time.
    pub factor_value_at_entry: Decimal,
    /// quantity * factor_value_at_entry, computed at insert.
    pub co2e: Decimal,
    /// Reporting period token, e.g. `2024` or `2024-Q1`.
    pub reporting_period: String,
    pub verification_status: VerificationStatus,
    pub entered_by: Uuid,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<DateTimeWithTimeZone>,
    /// Required when rejected, absent otherwise.
    pub rejection_note: Option<String>,
    pub notes: Option<String>,
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
    #[sea_orm(
        belongs_to = "super::emission_sources::Entity",
        from = "Column::SourceId",
        to = "super::emission_sources::Column::Id"
    )]
    EmissionSources,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl Related<super::emission_sources::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmissionSources.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
