//! Emissions ledger logic.
//!
//! This module implements the pure side of the emissions ledger:
//! - Entry input validation (quantity, reporting period, source state)
//! - Exact decimal CO2e computation
//! - The factor snapshot resolved into every new entry
//! - Filter types for ledger reads
//!
//! The snapshot rule is absolute: an entry stores the factor value in
//! force at creation time, and no later catalog edit touches it.

pub mod entry;
pub mod error;
pub mod types;

#[cfg(test)]
mod entry_props;

pub use entry::{compute_co2e, reporting_period_year, LedgerService};
pub use error::LedgerError;
pub use types::{EntryFilter, NewEntryInput, ResolvedEntry, MAX_REPORTING_YEAR, MIN_REPORTING_YEAR};
