//! Bore angle that makes the path meet the sight line at a chosen range.

use std::cmp::Ordering;

use ballistics_core::{deg_to_rad, moa_to_rad, rad_to_deg};
use tracing::{debug, warn};

use crate::flight::{Flight, Forces};
use crate::search::{SearchOutcome, StepSearch};
use crate::{Load, SolveError};

/// Coarser than the table integrator; a foot of path per step is plenty
/// for a zero.
const STEP_FT: f64 = 1.0;
/// Largest miss at the zero range still accepted as a zero [MOA], on top of
/// a flat inch.
const MISS_TOLERANCE_MOA: f64 = 0.1;

/// Bore angle [deg] that puts the projectile `y_intercept_in` above the line
/// of sight at `zero_range_yards`, on level ground and in still air.
///
/// `y_intercept_in` is usually 0; use e.g. 1.5 to sight in 1.5" high.
///
/// Returns [`SolveError::NoZero`] when no angle up to 45° reaches the
/// intercept, or when the converged angle does not carry the shot to the
/// zero range on the intercept.
pub fn solve_zero_angle(load: &Load, zero_range_yards: f64, y_intercept_in: f64) -> Result<f64, SolveError> {
    load.validate()?;
    if !(zero_range_yards.is_finite() && zero_range_yards > 0.0) {
        return Err(SolveError::InvalidInput("zero range must be positive"));
    }
    if !y_intercept_in.is_finite() {
        return Err(SolveError::InvalidInput("intercept must be finite"));
    }

    let zero_range_ft = zero_range_yards * 3.0;
    let intercept_ft = y_intercept_in / 12.0;

    let search = StepSearch::new(0.0, deg_to_rad(14.0), moa_to_rad(0.01)).with_upper_limit(deg_to_rad(45.0));
    let outcome = search.run(|angle| -> Result<Ordering, SolveError> {
        let shot = shoot(load, angle, zero_range_ft, Some(intercept_ft))?;
        Ok(shot.y.partial_cmp(&intercept_ft).unwrap_or(Ordering::Equal))
    })?;

    let (angle, iterations) = match outcome {
        SearchOutcome::Converged { value, iterations } => (value, iterations),
        SearchOutcome::Exhausted { value, iterations } => {
            let last_angle_deg = rad_to_deg(value);
            warn!(last_angle_deg, iterations, zero_range_yards, "no zero below 45 degrees");
            return Err(SolveError::NoZero { last_angle_deg });
        }
    };

    // the search only sees the sign of the miss; a shot that turned back or
    // fell short can still pin it to a boundary angle
    let angle_deg = rad_to_deg(angle);
    let check = shoot(load, angle, zero_range_ft, None)?;
    let allowed_ft = 1.0 / 12.0 + zero_range_ft * moa_to_rad(MISS_TOLERANCE_MOA);
    if !check.reached || (check.y - intercept_ft).abs() > allowed_ft {
        let miss_in = (check.y - intercept_ft) * 12.0;
        warn!(angle_deg, reached = check.reached, miss_in, zero_range_yards, "zero search settled off the intercept");
        return Err(SolveError::NoZero { last_angle_deg: angle_deg });
    }

    debug!(angle_deg, iterations, zero_range_yards, "zero angle converged");
    Ok(angle_deg)
}

/// Where a trial shot ended.
#[derive(Clone, Copy, Debug)]
struct Shot {
    /// Height [ft] at `range_ft`, or where the run was cut short.
    y: f64,
    /// Got past `range_ft`.
    reached: bool,
}

/// Fly a shot at `angle` [rad] out to `range_ft`.
///
/// With `floor_ft` set the run stops as soon as the shot is falling below it
/// or climbing steeper than 3:1, which is all the search needs to know.
/// Without it the run goes on until the range or the 3:1 guard in either
/// direction.
fn shoot(load: &Load, angle: f64, range_ft: f64, floor_ft: Option<f64>) -> Result<Shot, SolveError> {
    let forces = Forces::new(load.drag_function, load.drag_coefficient, angle, 0.0);
    let mut flight = Flight::launch(load.muzzle_velocity_fps, angle, load.sight_height_in);

    while flight.x() <= range_ft {
        flight.advance(&forces, STEP_FT)?;

        match floor_ft {
            Some(floor) => {
                // already falling below the intercept: it will not come back up
                if flight.vy() < 0.0 && flight.y() < floor {
                    break;
                }
                if flight.vy() > 3.0 * flight.vx() {
                    break;
                }
            }
            None => {
                if flight.too_steep() {
                    break;
                }
            }
        }
    }

    Ok(Shot { y: flight.y(), reached: flight.x() > range_ft })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compute_trajectory, Wind};
    use approx::assert_abs_diff_eq;
    use ballistics_models::DragFunction;

    #[test]
    fn zeroed_path_crosses_the_sight_line() {
        let load = Load::new(DragFunction::G1, 0.45, 2900.0, 1.5);
        let angle = solve_zero_angle(&load, 200.0, 0.0).unwrap();
        assert!(angle > 0.0 && angle < 1.0);

        let traj = compute_trajectory(&load, 0.0, angle, Wind::calm()).unwrap();
        // within a tenth of an inch of the sight line at 200 yd
        assert_abs_diff_eq!(traj[200].path_inches, 0.0, epsilon = 0.1);
    }

    #[test]
    fn longer_zeros_need_more_elevation() {
        let load = Load::new(DragFunction::G7, 0.3, 2700.0, 1.8);
        let short = solve_zero_angle(&load, 100.0, 0.0).unwrap();
        let long = solve_zero_angle(&load, 300.0, 0.0).unwrap();
        assert!(long > short);
    }

    #[test]
    fn positive_intercept_raises_the_bore() {
        let load = Load::new(DragFunction::G1, 0.45, 2900.0, 1.5);
        let flat = solve_zero_angle(&load, 100.0, 0.0).unwrap();
        let high = solve_zero_angle(&load, 100.0, 1.5).unwrap();
        assert!(high > flat);

        let traj = compute_trajectory(&load, 0.0, high, Wind::calm()).unwrap();
        assert_abs_diff_eq!(traj[100].path_inches, 1.5, epsilon = 0.1);
    }

    #[test]
    fn unreachable_range_is_reported() {
        // a slow, draggy projectile cannot reach two miles at any angle
        let load = Load::new(DragFunction::G1, 0.05, 300.0, 1.5);
        for range in [3500.0, 1500.0] {
            match solve_zero_angle(&load, range, 0.0) {
                Err(SolveError::NoZero { last_angle_deg }) => assert!(last_angle_deg > 0.0),
                other => panic!("expected NoZero at {range} yd, got {other:?}"),
            }
        }
    }

    #[test]
    fn turned_back_shot_does_not_reach_the_range() {
        let load = Load::new(DragFunction::G1, 0.05, 300.0, 1.5);
        let angle = deg_to_rad(40.0);
        let shot = shoot(&load, angle, 3500.0 * 3.0, None).unwrap();
        assert!(!shot.reached);

        // the search trial stops early and reads as "too high"
        let trial = shoot(&load, angle, 3500.0 * 3.0, Some(0.0)).unwrap();
        assert!(!trial.reached);
        assert!(trial.y > 0.0);
    }

    #[test]
    fn reachable_zero_passes_the_range_check() {
        let load = Load::new(DragFunction::G1, 0.5, 1200.0, 1.6);
        let angle_deg = solve_zero_angle(&load, 100.0, 0.0).unwrap();
        let shot = shoot(&load, deg_to_rad(angle_deg), 300.0, None).unwrap();
        assert!(shot.reached);
        assert_abs_diff_eq!(shot.y, 0.0, epsilon = 1.0 / 12.0);
    }

    #[test]
    fn repeated_solves_are_identical() {
        let load = Load::new(DragFunction::G7, 0.3, 2700.0, 1.8);
        let a = solve_zero_angle(&load, 300.0, 1.0).unwrap();
        let b = solve_zero_angle(&load, 300.0, 1.0).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn bad_range_is_rejected() {
        let load = Load::new(DragFunction::G1, 0.45, 2900.0, 1.5);
        assert!(matches!(solve_zero_angle(&load, 0.0, 0.0), Err(SolveError::InvalidInput(_))));
        assert!(matches!(solve_zero_angle(&load, 100.0, f64::NAN), Err(SolveError::InvalidInput(_))));
    }
}
