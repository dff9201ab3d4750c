//! Core business logic for CarbonTrace.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `access` - Role capability checks for mutating operations
//! - `catalog` - Emission factor catalog rules and validation
//! - `ledger` - Activity entries and CO2e computation
//! - `verification` - Entry verification state machine
//! - `reduction` - Reduction goals, initiatives, and progress math
//! - `cache` - Read-view cache with family-scoped invalidation

pub mod access;
pub mod cache;
pub mod catalog;
pub mod ledger;
pub mod reduction;
pub mod verification;
