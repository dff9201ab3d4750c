//! `SeaORM` entity definitions for the CarbonTrace schema.

pub mod categories;
pub mod emission_entries;
pub mod emission_sources;
pub mod factor_history;
pub mod initiative_progress;
pub mod initiatives;
pub mod organizations;
pub mod reduction_goals;
pub mod sea_orm_active_enums;
pub mod users;
