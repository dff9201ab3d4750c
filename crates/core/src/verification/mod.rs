//! Entry verification state machine.
//!
//! Governs the `unverified -> verified | rejected` lifecycle of
//! emission entries. Both outcomes are terminal: corrections are made
//! by recording a new entry, never by un-deciding an existing one.

pub mod error;
pub mod service;
pub mod types;

pub use error::VerificationError;
pub use service::VerificationService;
pub use types::{Decision, DecisionOutcome, VerificationStatus};
