//! Progress math against a frozen baseline.

use rust_decimal::Decimal;

use super::error::ReductionError;
use super::types::GoalSummary;

const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Validates the shape of a goal before baseline computation.
///
/// # Errors
///
/// * [`ReductionError::InvalidYearRange`] if `target_year <= baseline_year`
/// * [`ReductionError::InvalidTargetPercentage`] if the target is
///   outside (0, 100]
pub fn validate_goal_shape(
    baseline_year: i32,
    target_year: i32,
    target_reduction_percentage: Decimal,
) -> Result<(), ReductionError> {
    if target_year <= baseline_year {
        return Err(ReductionError::InvalidYearRange {
            baseline_year,
            target_year,
        });
    }
    if target_reduction_percentage <= Decimal::ZERO || target_reduction_percentage > HUNDRED {
        return Err(ReductionError::InvalidTargetPercentage(
            target_reduction_percentage,
        ));
    }
    Ok(())
}

/// Validates an initiative progress percentage.
///
/// Percentages live in [0, 100] but need not be monotonic across the
/// timeline; a regression is valid data, not an error.
///
/// # Errors
///
/// Returns [`ReductionError::InvalidProgressPercentage`] when outside
/// the range.
pub fn validate_progress_percentage(percentage: Decimal) -> Result<(), ReductionError> {
    if percentage < Decimal::ZERO || percentage > HUNDRED {
        return Err(ReductionError::InvalidProgressPercentage(percentage));
    }
    Ok(())
}

/// Percent change of a year total against the goal's frozen baseline.
///
/// `(current - baseline) / baseline * 100`; negative means emissions
/// fell. Returns `None` for a zero baseline, which goal creation rules
/// out for goals created through the tracker.
#[must_use]
pub fn percent_delta(current_year_total: Decimal, goal: &GoalSummary) -> Option<Decimal> {
    if goal.baseline_emissions_total == Decimal::ZERO {
        return None;
    }
    Some(
        (current_year_total - goal.baseline_emissions_total) / goal.baseline_emissions_total
            * HUNDRED,
    )
}

/// Derived progress metrics for a goal at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressMetrics {
    /// Emissions level the goal aims for.
    pub target_emissions: Decimal,
    /// Absolute reduction achieved so far (baseline - current).
    pub reduction_achieved: Decimal,
    /// Reduction achieved as a percentage of the baseline.
    pub reduction_achieved_pct: Decimal,
    /// Linear interpolation of where the goal "should" be this year.
    pub expected_progress_pct: Decimal,
    /// Whether achieved progress meets or beats the expected line.
    pub on_track: bool,
    /// Years left until the target year (zero when past it).
    pub years_remaining: i32,
}

impl ProgressMetrics {
    /// Computes progress for a goal given the current year's verified
    /// emissions total.
    ///
    /// The expected line runs linearly from 0% at the baseline year to
    /// the full target percentage at the target year.
    #[must_use]
    pub fn compute(goal: &GoalSummary, current_year: i32, current_year_total: Decimal) -> Self {
        let baseline = goal.baseline_emissions_total;
        let target_emissions =
            baseline * (Decimal::ONE - goal.target_reduction_percentage / HUNDRED);

        let reduction_achieved = baseline - current_year_total;
        let reduction_achieved_pct = if baseline == Decimal::ZERO {
            Decimal::ZERO
        } else {
            reduction_achieved / baseline * HUNDRED
        };

        let total_years = goal.target_year - goal.baseline_year;
        let years_elapsed = current_year - goal.baseline_year;
        let expected_progress_pct = if total_years > 0 {
            Decimal::from(years_elapsed.clamp(0, total_years)) * goal.target_reduction_percentage
                / Decimal::from(total_years)
        } else {
            Decimal::ZERO
        };

        Self {
            target_emissions,
            reduction_achieved,
            reduction_achieved_pct,
            expected_progress_pct,
            on_track: reduction_achieved_pct >= expected_progress_pct,
            years_remaining: (goal.target_year - current_year).max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn goal() -> GoalSummary {
        GoalSummary {
            baseline_year: 2020,
            baseline_emissions_total: dec!(1000),
            target_year: 2030,
            target_reduction_percentage: dec!(40),
        }
    }

    #[test]
    fn test_goal_shape_validation() {
        assert_eq!(validate_goal_shape(2020, 2030, dec!(40)), Ok(()));
        assert_eq!(
            validate_goal_shape(2030, 2030, dec!(40)),
            Err(ReductionError::InvalidYearRange {
                baseline_year: 2030,
                target_year: 2030
            })
        );
        assert_eq!(
            validate_goal_shape(2020, 2030, Decimal::ZERO),
            Err(ReductionError::InvalidTargetPercentage(Decimal::ZERO))
        );
        assert_eq!(
            validate_goal_shape(2020, 2030, dec!(100.5)),
            Err(ReductionError::InvalidTargetPercentage(dec!(100.5)))
        );
        assert_eq!(validate_goal_shape(2020, 2030, dec!(100)), Ok(()));
    }

    #[test]
    fn test_progress_percentage_bounds() {
        assert_eq!(validate_progress_percentage(Decimal::ZERO), Ok(()));
        assert_eq!(validate_progress_percentage(dec!(100)), Ok(()));
        assert_eq!(
            validate_progress_percentage(dec!(100.1)),
            Err(ReductionError::InvalidProgressPercentage(dec!(100.1)))
        );
        assert_eq!(
            validate_progress_percentage(dec!(-1)),
            Err(ReductionError::InvalidProgressPercentage(dec!(-1)))
        );
    }

    #[test]
    fn test_percent_delta() {
        let g = goal();
        assert_eq!(percent_delta(dec!(900), &g), Some(dec!(-10)));
        assert_eq!(percent_delta(dec!(1100), &g), Some(dec!(10)));
        assert_eq!(percent_delta(dec!(1000), &g), Some(Decimal::ZERO));

        let zero_baseline = GoalSummary {
            baseline_emissions_total: Decimal::ZERO,
            ..g
        };
        assert_eq!(percent_delta(dec!(5), &zero_baseline), None);
    }

    #[test]
    fn test_progress_metrics_on_track() {
        // 2025 is halfway to 2030: expected = 20% of the 40% target.
        let metrics = ProgressMetrics::compute(&goal(), 2025, dec!(780));
        assert_eq!(metrics.target_emissions, dec!(600));
        assert_eq!(metrics.reduction_achieved, dec!(220));
        assert_eq!(metrics.reduction_achieved_pct, dec!(22));
        assert_eq!(metrics.expected_progress_pct, dec!(20));
        assert!(metrics.on_track);
        assert_eq!(metrics.years_remaining, 5);
    }

    #[test]
    fn test_progress_metrics_behind_schedule() {
        let metrics = ProgressMetrics::compute(&goal(), 2025, dec!(950));
        assert_eq!(metrics.reduction_achieved_pct, dec!(5));
        assert!(!metrics.on_track);
    }

    #[test]
    fn test_progress_metrics_regression_above_baseline() {
        // Emissions grew; achieved percentage is negative.
        let metrics = ProgressMetrics::compute(&goal(), 2021, dec!(1100));
        assert_eq!(metrics.reduction_achieved, dec!(-100));
        assert_eq!(metrics.reduction_achieved_pct, dec!(-10));
        assert!(!metrics.on_track);
    }

    #[test]
    fn test_progress_metrics_past_target_year() {
        let metrics = ProgressMetrics::compute(&goal(), 2032, dec!(600));
        assert_eq!(metrics.expected_progress_pct, dec!(40));
        assert_eq!(metrics.years_remaining, 0);
        assert!(metrics.on_track);
    }
}
