//! Emission factor catalog rules.
//!
//! This module holds the pure rules of the factor catalog:
//! - Scope and source classification types
//! - Factor value and change-reason validation
//! - Custom source code generation and deletion guards
//!
//! Persistence, history appends, and cache invalidation live in the
//! db crate's catalog repository, which delegates every decision here.

pub mod error;
pub mod types;
pub mod validation;

pub use error::CatalogError;
pub use types::{Scope, SourceInfo, SourceKind};
pub use validation::{custom_source_code, validate_factor_change, validate_source_deletion};
