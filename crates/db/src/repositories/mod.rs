//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Read-heavy repositories take a shared
//! [`ViewCache`](carbontrace_core::cache::ViewCache) and clear the
//! affected families on every mutation.

pub mod catalog;
pub mod entry;
pub mod organization;
pub mod reduction;
pub mod user;

pub use catalog::{CatalogRepository, CatalogStoreError, CreateCustomSourceInput};
pub use entry::{BatchDecisionReport, EntryRepository, LedgerStoreError};
pub use organization::{OrganizationError, OrganizationRepository};
pub use reduction::{
    CreateGoalInput, CreateInitiativeInput, GoalProgress, ReductionRepository, ReductionStoreError,
};
pub use user::{UserError, UserRepository};
