//! Reduction goals, initiatives, and progress math.
//!
//! Goals are anchored to a baseline total computed from *verified*
//! entries at creation time and frozen thereafter; later corrections
//! to baseline-year data never change an existing goal. Initiatives
//! and their progress timeline are append-only records under a goal.

pub mod error;
pub mod progress;
pub mod types;

pub use error::ReductionError;
pub use progress::{percent_delta, validate_goal_shape, validate_progress_percentage, ProgressMetrics};
pub use types::{GoalStatus, GoalSummary, InitiativeStatus};
